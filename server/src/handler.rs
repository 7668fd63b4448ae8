use std::ops::Deref;
use std::sync::Arc;

use vodca::References;

use driver::database::PostgresDatabase;
use kernel::KernelError;

/// Router state, cheap to clone into every handler.
#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init().await?)))
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(References)]
pub struct Handler {
    database: PostgresDatabase,
}

impl Handler {
    async fn init() -> error_stack::Result<Self, KernelError> {
        let database = PostgresDatabase::new().await?;
        Ok(Self { database })
    }
}
