use destructure::Destructure;
use vodca::References;

use crate::entity::{Book, CartLine};

/// A pending cart line read together with its book.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct CartEntry {
    line: CartLine,
    book: Book,
}

impl CartEntry {
    pub fn new(line: CartLine, book: Book) -> Self {
        Self { line, book }
    }

    pub fn subtotal(&self) -> i64 {
        self.book.price().total(self.line.quantity())
    }
}
