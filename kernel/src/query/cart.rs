use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BookId, CartEntry, CartLine, CartLineId, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait CartQuery: 'static + Sync + Send {
    type Transaction: Transaction;

    /// Pending line owned by `user_id`.
    async fn find_pending_by_id(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        id: &CartLineId,
    ) -> error_stack::Result<Option<CartEntry>, KernelError>;

    /// Locks the line when present.
    async fn find_pending_by_book(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<Option<CartLine>, KernelError>;

    async fn find_pending(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<CartEntry>, KernelError>;

    /// Pending lines with their books, both locked until the transaction ends.
    /// Books are locked in id order.
    async fn find_pending_for_checkout(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<CartEntry>, KernelError>;
}

pub trait DependOnCartQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type CartQuery: CartQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn cart_query(&self) -> &Self::CartQuery;
}
