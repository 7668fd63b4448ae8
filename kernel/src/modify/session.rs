use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{Session, SessionToken};
use crate::KernelError;

#[async_trait::async_trait]
pub trait SessionModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        session: &Session,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        token: &SessionToken,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnSessionModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type SessionModifier: SessionModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn session_modifier(&self) -> &Self::SessionModifier;
}
