use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{SelectLimit, SelectOffset, User, UserId, UserName, UserSummary};
use crate::KernelError;

#[async_trait::async_trait]
pub trait UserQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError>;

    async fn find_by_name(
        &self,
        con: &mut Self::Transaction,
        name: &UserName,
    ) -> error_stack::Result<Option<User>, KernelError>;

    async fn count(&self, con: &mut Self::Transaction) -> error_stack::Result<i64, KernelError>;

    async fn find_summaries(
        &self,
        con: &mut Self::Transaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<UserSummary>, KernelError>;

    async fn find_summary_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &UserId,
    ) -> error_stack::Result<Option<UserSummary>, KernelError>;
}

pub trait DependOnUserQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type UserQuery: UserQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn user_query(&self) -> &Self::UserQuery;
}
