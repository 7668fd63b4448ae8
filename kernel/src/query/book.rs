use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Book, BookId, SelectLimit, SelectOffset};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BookQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError>;

    /// Same as `find_by_id`, holding the row lock until the transaction ends.
    async fn find_by_id_for_update(
        &self,
        con: &mut Self::Transaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError>;

    async fn find_all(
        &self,
        con: &mut Self::Transaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Book>, KernelError>;
}

pub trait DependOnBookQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type BookQuery: BookQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn book_query(&self) -> &Self::BookQuery;
}
