use std::ops::{Deref, DerefMut};
use std::time::Duration;

use error_stack::ResultExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnBookQuery, DependOnCartQuery, DependOnOrderQuery, DependOnSessionQuery,
    DependOnUserQuery,
};
use kernel::interface::update::{
    DependOnBookModifier, DependOnCartModifier, DependOnSessionModifier, DependOnUserModifier,
};
use kernel::KernelError;

use crate::env;
use crate::error::ConvertError;

pub use self::{book::*, cart::*, order::*, session::*, user::*};

mod book;
mod cart;
mod order;
mod session;
mod user;

static POSTGRES_URL: &str = "POSTGRES_URL";
static POSTGRES_MAX_CONNECTIONS: &str = "POSTGRES_MAX_CONNECTIONS";

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    /// Connects with `POSTGRES_URL` and brings the schema up to date.
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        let max_connections: u32 = match env(POSTGRES_MAX_CONNECTIONS) {
            Ok(value) => value
                .parse::<u32>()
                .change_context_lazy(|| KernelError::Internal)
                .attach_printable_lazy(|| format!("Env {} is not a number", POSTGRES_MAX_CONNECTIONS))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(&url)
            .await
            .convert_error()?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable("Failed to migrate database")?;
        tracing::info!(max_connections, "connected to postgres");

        Ok(Self { pool })
    }
}

pub struct PostgresTransaction(sqlx::Transaction<'static, Postgres>);

impl Deref for PostgresTransaction {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresTransaction;
    async fn transact(&self) -> error_stack::Result<PostgresTransaction, KernelError> {
        let transaction = self.pool.begin().await.convert_error()?;
        Ok(PostgresTransaction(transaction))
    }
}

#[async_trait::async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

impl DependOnBookQuery for PostgresDatabase {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for PostgresDatabase {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}

impl DependOnCartQuery for PostgresDatabase {
    type CartQuery = PostgresCartRepository;
    fn cart_query(&self) -> &Self::CartQuery {
        &PostgresCartRepository
    }
}

impl DependOnCartModifier for PostgresDatabase {
    type CartModifier = PostgresCartRepository;
    fn cart_modifier(&self) -> &Self::CartModifier {
        &PostgresCartRepository
    }
}

impl DependOnOrderQuery for PostgresDatabase {
    type OrderQuery = PostgresOrderRepository;
    fn order_query(&self) -> &Self::OrderQuery {
        &PostgresOrderRepository
    }
}

impl DependOnUserQuery for PostgresDatabase {
    type UserQuery = PostgresUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &PostgresUserRepository
    }
}

impl DependOnUserModifier for PostgresDatabase {
    type UserModifier = PostgresUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &PostgresUserRepository
    }
}

impl DependOnSessionQuery for PostgresDatabase {
    type SessionQuery = PostgresSessionRepository;
    fn session_query(&self) -> &Self::SessionQuery {
        &PostgresSessionRepository
    }
}

impl DependOnSessionModifier for PostgresDatabase {
    type SessionModifier = PostgresSessionRepository;
    fn session_modifier(&self) -> &Self::SessionModifier {
        &PostgresSessionRepository
    }
}

#[cfg(test)]
pub(in crate::database) mod fixture {
    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::update::{BookModifier, UserModifier};
    use kernel::prelude::entity::{
        Book, BookAuthor, BookId, BookImage, BookPrice, BookStock, BookTitle, CreatedAt, IsAdmin,
        PasswordHash, User, UserId, UserName,
    };
    use kernel::KernelError;

    use crate::database::postgres::{PostgresBookRepository, PostgresDatabase, PostgresUserRepository};

    pub fn book(stock: i32) -> Book {
        Book::new(
            BookId::new(uuid::Uuid::new_v4()),
            BookTitle::new(format!("title-{}", uuid::Uuid::new_v4())),
            BookAuthor::new("author"),
            BookPrice::new(300),
            BookStock::new(stock),
            BookImage::new("/images/test.jpg"),
            CreatedAt::now(),
        )
    }

    pub fn user() -> User {
        User::new(
            UserId::default(),
            UserName::new(format!("user-{}", uuid::Uuid::new_v4())),
            PasswordHash::new("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"),
            IsAdmin::new(false),
            CreatedAt::now(),
        )
    }

    /// Commits a fresh user and a book with `stock` copies.
    pub async fn seed(
        db: &PostgresDatabase,
        stock: i32,
    ) -> error_stack::Result<(User, Book), KernelError> {
        let mut con = db.transact().await?;
        let user = user();
        let book = book(stock);
        PostgresUserRepository.create(&mut con, &user).await?;
        PostgresBookRepository.create(&mut con, &book).await?;
        con.commit().await?;
        Ok((user, book))
    }
}
