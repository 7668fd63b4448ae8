use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{CartLine, CartLineId, UserId};
use crate::KernelError;

#[async_trait::async_trait]
pub trait CartModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        line: &CartLine,
    ) -> error_stack::Result<(), KernelError>;

    /// Only pending lines are updated.
    async fn update_quantity(
        &self,
        con: &mut Self::Transaction,
        line: &CartLine,
    ) -> error_stack::Result<(), KernelError>;

    /// Persists `Pending -> Completed`. Fails with `Concurrency` when the row
    /// is no longer pending.
    async fn complete(
        &self,
        con: &mut Self::Transaction,
        line: &CartLine,
    ) -> error_stack::Result<(), KernelError>;

    /// Deletes a pending line owned by `user_id`. Returns false when nothing matched.
    async fn delete(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        id: &CartLineId,
    ) -> error_stack::Result<bool, KernelError>;
}

pub trait DependOnCartModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type CartModifier: CartModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn cart_modifier(&self) -> &Self::CartModifier;
}
