use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{
    Book, BookAuthor, BookId, BookImage, BookPrice, BookStock, BookTitle, CreatedAt, SelectLimit,
    SelectOffset,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id, false).await
    }

    async fn find_by_id_for_update(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id, true).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_all(con, limit, offset).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::create(con, book).await
    }

    async fn update_stock(
        &self,
        con: &mut PostgresTransaction,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::update_stock(con, book).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<bool, KernelError> {
        PgBookInternal::delete(con, book_id).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: Uuid,
    title: String,
    author: String,
    price: i32,
    stock: i32,
    image: String,
    created_at: OffsetDateTime,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        Book::new(
            BookId::new(value.id),
            BookTitle::new(value.title),
            BookAuthor::new(value.author),
            BookPrice::new(value.price),
            BookStock::new(value.stock),
            BookImage::new(value.image),
            CreatedAt::new(value.created_at),
        )
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
        lock: bool,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let query = if lock {
            // language=postgresql
            r#"
            SELECT id, title, author, price, stock, image, created_at
            FROM books
            WHERE id = $1
            FOR UPDATE
            "#
        } else {
            // language=postgresql
            r#"
            SELECT id, title, author, price, stock, image, created_at
            FROM books
            WHERE id = $1
            "#
        };
        let row = sqlx::query_as::<_, BookRow>(query)
            .bind(id.as_ref())
            .fetch_optional(con)
            .await
            .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn find_all(
        con: &mut PgConnection,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, price, stock, image, created_at
            FROM books
            ORDER BY created_at, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit.as_ref())
        .bind(offset.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn create(con: &mut PgConnection, book: &Book) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO books (id, title, author, price, stock, image, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.title().as_ref())
        .bind(book.author().as_ref())
        .bind(book.price().as_ref())
        .bind(book.stock().as_ref())
        .bind(book.image().as_ref())
        .bind(book.created_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update_stock(
        con: &mut PgConnection,
        book: &Book,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE books
            SET stock = $2
            WHERE id = $1
            "#,
        )
        .bind(book.id().as_ref())
        .bind(book.stock().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(con: &mut PgConnection, book_id: &BookId) -> error_stack::Result<bool, KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            DELETE FROM books
            WHERE id = $1
            "#,
        )
        .bind(book_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod test {
    use application::service::UpdateStockService;
    use application::transfer::TakeBookDto;
    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{BookStock, SelectLimit, SelectOffset};
    use kernel::KernelError;

    use crate::database::postgres::book::PostgresBookRepository;
    use crate::database::postgres::fixture;
    use crate::database::postgres::PostgresDatabase;

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let book = fixture::book(3);
        let id = book.id().clone();

        PostgresBookRepository.create(&mut con, &book).await?;
        let found = PostgresBookRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(found.as_ref().map(|b| b.title()), Some(book.title()));

        let all = PostgresBookRepository
            .find_all(&mut con, &SelectLimit::new(100), &SelectOffset::new(0))
            .await?;
        assert!(all.iter().any(|b| b.id() == &id));

        let mut locked = PostgresBookRepository
            .find_by_id_for_update(&mut con, &id)
            .await?
            .expect("book was just created");
        locked.substitute(|b| *b.stock = BookStock::new(7));
        PostgresBookRepository.update_stock(&mut con, &locked).await?;
        let found = PostgresBookRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(found.map(|b| *b.stock().as_ref()), Some(7));

        assert!(PostgresBookRepository.delete(&mut con, &id).await?);
        assert!(!PostgresBookRepository.delete(&mut con, &id).await?);
        let found = PostgresBookRepository.find_by_id(&mut con, &id).await?;
        assert!(found.is_none());

        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn negative_stock_is_rejected_by_the_table() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let mut book = fixture::book(1);
        PostgresBookRepository.create(&mut con, &book).await?;

        book.substitute(|b| *b.stock = BookStock::new(-1));
        let report = PostgresBookRepository
            .update_stock(&mut con, &book)
            .await
            .unwrap_err();
        assert!(matches!(report.current_context(), KernelError::Internal));
        Ok(())
    }
    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn take_one_stops_at_zero() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let book = fixture::book(1);
        PostgresBookRepository.create(&mut con, &book).await?;
        con.commit().await?;

        let taken = db
            .take_one(TakeBookDto {
                id: book.id().clone(),
            })
            .await?;
        assert_eq!(*taken.stock().as_ref(), 0);

        let report = db
            .take_one(TakeBookDto {
                id: book.id().clone(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            report.current_context(),
            KernelError::InsufficientStock(title) if title == book.title()
        ));

        let mut con = db.transact().await?;
        let found = PostgresBookRepository.find_by_id(&mut con, book.id()).await?;
        assert_eq!(found.map(|b| *b.stock().as_ref()), Some(0));
        Ok(())
    }
}
