use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{CartLineId, Order, SelectLimit, SelectOffset, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait OrderQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &CartLineId,
    ) -> error_stack::Result<Option<Order>, KernelError>;

    /// Newest first.
    async fn find_all(
        &self,
        con: &mut Self::Transaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Order>, KernelError>;

    async fn find_by_user(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<Order>, KernelError>;
}

pub trait DependOnOrderQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type OrderQuery: OrderQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn order_query(&self) -> &Self::OrderQuery;
}
