use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{User, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait UserModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        user: &User,
    ) -> error_stack::Result<(), KernelError>;
    /// Serializes registrations until the transaction ends.
    async fn lock_registrations(
        &self,
        con: &mut Self::Transaction,
    ) -> error_stack::Result<(), KernelError>;
    /// Returns false when no row matched.
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
    ) -> error_stack::Result<bool, KernelError>;
}

pub trait DependOnUserModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type UserModifier: UserModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn user_modifier(&self) -> &Self::UserModifier;
}
