mod author;
mod id;
mod image;
mod price;
mod stock;
mod title;

pub use self::{author::*, id::*, image::*, price::*, stock::*, title::*};
use crate::entity::{CartQuantity, CreatedAt};
use crate::KernelError;
use destructure::{Destructure, Mutation};
use error_stack::{Report, ResultExt};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Book {
    id: BookId,
    title: BookTitle,
    author: BookAuthor,
    price: BookPrice,
    stock: BookStock,
    image: BookImage,
    created_at: CreatedAt<Book>,
}

impl Book {
    pub fn new(
        id: BookId,
        title: BookTitle,
        author: BookAuthor,
        price: BookPrice,
        stock: BookStock,
        image: BookImage,
        created_at: CreatedAt<Book>,
    ) -> Self {
        Self {
            id,
            title,
            author,
            price,
            stock,
            image,
            created_at,
        }
    }

    pub fn can_supply(&self, quantity: &CartQuantity) -> bool {
        self.stock.covers(quantity)
    }

    /// Takes `quantity` units out of stock, leaving the book untouched when it cannot.
    pub fn withdraw(&mut self, quantity: &CartQuantity) -> error_stack::Result<(), KernelError> {
        let remaining = self
            .stock
            .minus(quantity)
            .ok_or_else(|| Report::new(KernelError::InsufficientStock(self.title.clone())))
            .attach_printable_lazy(|| {
                format!(
                    "book {} has {} in stock, {} requested",
                    self.id.as_ref(),
                    self.stock.as_ref(),
                    quantity.as_ref()
                )
            })?;
        self.stock = remaining;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use crate::entity::{
        Book, BookAuthor, BookId, BookImage, BookPrice, BookStock, BookTitle, CartQuantity,
        CreatedAt,
    };
    use crate::KernelError;

    fn book(stock: i32) -> Book {
        Book::new(
            BookId::new(Uuid::new_v4()),
            BookTitle::new("1984"),
            BookAuthor::new("George Orwell"),
            BookPrice::new(199),
            BookStock::new(stock),
            BookImage::new("/images/1984.jpg"),
            CreatedAt::now(),
        )
    }

    #[test]
    fn withdraw_down_to_zero() {
        let mut book = book(5);
        book.withdraw(&CartQuantity::new(5)).unwrap();
        assert_eq!(book.stock(), &BookStock::new(0));
    }

    #[test]
    fn withdraw_more_than_stock_keeps_book() {
        let mut book = book(2);
        let before = book.clone();
        let report = book.withdraw(&CartQuantity::new(3)).unwrap_err();
        assert!(matches!(
            report.current_context(),
            KernelError::InsufficientStock(title) if title == &BookTitle::new("1984")
        ));
        assert_eq!(book, before);
    }

    #[test]
    fn empty_stock_supplies_nothing() {
        let book = book(0);
        assert!(!book.can_supply(&CartQuantity::new(1)));
    }
}
