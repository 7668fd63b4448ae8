mod entry;
mod id;
mod quantity;
mod status;

pub use self::{entry::*, id::*, quantity::*, status::*};
use crate::entity::{BookId, CreatedAt, UserId};
use crate::KernelError;
use destructure::{Destructure, Mutation};
use error_stack::Report;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct CartLine {
    id: CartLineId,
    user_id: UserId,
    book_id: BookId,
    quantity: CartQuantity,
    status: CartStatus,
    created_at: CreatedAt<CartLine>,
}

impl CartLine {
    pub fn new(
        id: CartLineId,
        user_id: UserId,
        book_id: BookId,
        quantity: CartQuantity,
        status: CartStatus,
        created_at: CreatedAt<CartLine>,
    ) -> Self {
        Self {
            id,
            user_id,
            book_id,
            quantity,
            status,
            created_at,
        }
    }

    pub fn pending(user_id: UserId, book_id: BookId, quantity: CartQuantity) -> Self {
        Self::new(
            CartLineId::default(),
            user_id,
            book_id,
            quantity,
            CartStatus::Pending,
            CreatedAt::now(),
        )
    }

    pub fn is_pending(&self) -> bool {
        self.status == CartStatus::Pending
    }

    pub fn complete(&mut self) -> error_stack::Result<(), KernelError> {
        self.status = self.status.complete().ok_or_else(|| {
            Report::new(KernelError::Concurrency)
                .attach_printable(format!("cart line {} already completed", self.id.as_ref()))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use crate::entity::{BookId, CartLine, CartQuantity, CartStatus, UserId};
    use crate::KernelError;

    #[test]
    fn completes_once() {
        let mut line = CartLine::pending(
            UserId::new(Uuid::new_v4()),
            BookId::new(Uuid::new_v4()),
            CartQuantity::new(2),
        );
        assert!(line.is_pending());

        line.complete().unwrap();
        assert_eq!(line.status(), &CartStatus::Completed);

        let report = line.complete().unwrap_err();
        assert!(matches!(report.current_context(), KernelError::Concurrency));
        assert_eq!(line.status(), &CartStatus::Completed);
    }
}
