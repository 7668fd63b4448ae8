use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::CartQuery;
use kernel::interface::update::CartModifier;
use kernel::prelude::entity::{
    Book, BookAuthor, BookId, BookImage, BookPrice, BookStock, BookTitle, CartEntry, CartLine,
    CartLineId, CartQuantity, CartStatus, CreatedAt, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresCartRepository;

#[async_trait::async_trait]
impl CartQuery for PostgresCartRepository {
    type Transaction = PostgresTransaction;

    async fn find_pending_by_id(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
        id: &CartLineId,
    ) -> error_stack::Result<Option<CartEntry>, KernelError> {
        PgCartInternal::find_pending_by_id(con, user_id, id).await
    }

    async fn find_pending_by_book(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<Option<CartLine>, KernelError> {
        PgCartInternal::find_pending_by_book(con, user_id, book_id).await
    }

    async fn find_pending(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<CartEntry>, KernelError> {
        PgCartInternal::find_pending(con, user_id).await
    }

    async fn find_pending_for_checkout(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<CartEntry>, KernelError> {
        PgCartInternal::find_pending_for_checkout(con, user_id).await
    }
}

#[async_trait::async_trait]
impl CartModifier for PostgresCartRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        line: &CartLine,
    ) -> error_stack::Result<(), KernelError> {
        PgCartInternal::create(con, line).await
    }

    async fn update_quantity(
        &self,
        con: &mut PostgresTransaction,
        line: &CartLine,
    ) -> error_stack::Result<(), KernelError> {
        PgCartInternal::update_quantity(con, line).await
    }

    async fn complete(
        &self,
        con: &mut PostgresTransaction,
        line: &CartLine,
    ) -> error_stack::Result<(), KernelError> {
        PgCartInternal::complete(con, line).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
        id: &CartLineId,
    ) -> error_stack::Result<bool, KernelError> {
        PgCartInternal::delete(con, user_id, id).await
    }
}

#[derive(sqlx::FromRow)]
struct CartLineRow {
    id: Uuid,
    user_id: Uuid,
    book_id: Uuid,
    quantity: i32,
    status: String,
    created_at: OffsetDateTime,
}

impl TryFrom<CartLineRow> for CartLine {
    type Error = error_stack::Report<KernelError>;
    fn try_from(value: CartLineRow) -> Result<Self, Self::Error> {
        Ok(CartLine::new(
            CartLineId::new(value.id),
            UserId::new(value.user_id),
            BookId::new(value.book_id),
            CartQuantity::new(value.quantity),
            value.status.parse::<CartStatus>()?,
            CreatedAt::new(value.created_at),
        ))
    }
}

/// A cart line joined with its book. Book columns carry a `book_` prefix.
#[derive(sqlx::FromRow)]
struct CartEntryRow {
    id: Uuid,
    user_id: Uuid,
    book_id: Uuid,
    quantity: i32,
    status: String,
    created_at: OffsetDateTime,
    book_title: String,
    book_author: String,
    book_price: i32,
    book_stock: i32,
    book_image: String,
    book_created_at: OffsetDateTime,
}

impl TryFrom<CartEntryRow> for CartEntry {
    type Error = error_stack::Report<KernelError>;
    fn try_from(value: CartEntryRow) -> Result<Self, Self::Error> {
        let book = Book::new(
            BookId::new(value.book_id),
            BookTitle::new(value.book_title),
            BookAuthor::new(value.book_author),
            BookPrice::new(value.book_price),
            BookStock::new(value.book_stock),
            BookImage::new(value.book_image),
            CreatedAt::new(value.book_created_at),
        );
        let line = CartLine::try_from(CartLineRow {
            id: value.id,
            user_id: value.user_id,
            book_id: value.book_id,
            quantity: value.quantity,
            status: value.status,
            created_at: value.created_at,
        })?;
        Ok(CartEntry::new(line, book))
    }
}

fn into_entries(rows: Vec<CartEntryRow>) -> error_stack::Result<Vec<CartEntry>, KernelError> {
    rows.into_iter().map(CartEntry::try_from).collect()
}

pub(in crate::database) struct PgCartInternal;

impl PgCartInternal {
    async fn find_pending_by_id(
        con: &mut PgConnection,
        user_id: &UserId,
        id: &CartLineId,
    ) -> error_stack::Result<Option<CartEntry>, KernelError> {
        let row = sqlx::query_as::<_, CartEntryRow>(
            // language=postgresql
            r#"
            SELECT c.id, c.user_id, c.book_id, c.quantity, c.status, c.created_at,
                   b.title AS book_title, b.author AS book_author, b.price AS book_price,
                   b.stock AS book_stock, b.image AS book_image, b.created_at AS book_created_at
            FROM cart_lines c
            JOIN books b ON b.id = c.book_id
            WHERE c.id = $1 AND c.user_id = $2 AND c.status = 'pending'
            FOR UPDATE OF c
            "#,
        )
        .bind(id.as_ref())
        .bind(user_id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(CartEntry::try_from).transpose()
    }

    async fn find_pending_by_book(
        con: &mut PgConnection,
        user_id: &UserId,
        book_id: &BookId,
    ) -> error_stack::Result<Option<CartLine>, KernelError> {
        let row = sqlx::query_as::<_, CartLineRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, book_id, quantity, status, created_at
            FROM cart_lines
            WHERE user_id = $1 AND book_id = $2 AND status = 'pending'
            FOR UPDATE
            "#,
        )
        .bind(user_id.as_ref())
        .bind(book_id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(CartLine::try_from).transpose()
    }

    async fn find_pending(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<CartEntry>, KernelError> {
        let rows = sqlx::query_as::<_, CartEntryRow>(
            // language=postgresql
            r#"
            SELECT c.id, c.user_id, c.book_id, c.quantity, c.status, c.created_at,
                   b.title AS book_title, b.author AS book_author, b.price AS book_price,
                   b.stock AS book_stock, b.image AS book_image, b.created_at AS book_created_at
            FROM cart_lines c
            JOIN books b ON b.id = c.book_id
            WHERE c.user_id = $1 AND c.status = 'pending'
            ORDER BY c.created_at, c.id
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        into_entries(rows)
    }

    async fn find_pending_for_checkout(
        con: &mut PgConnection,
        user_id: &UserId,
    ) -> error_stack::Result<Vec<CartEntry>, KernelError> {
        let rows = sqlx::query_as::<_, CartEntryRow>(
            // language=postgresql
            r#"
            SELECT c.id, c.user_id, c.book_id, c.quantity, c.status, c.created_at,
                   b.title AS book_title, b.author AS book_author, b.price AS book_price,
                   b.stock AS book_stock, b.image AS book_image, b.created_at AS book_created_at
            FROM cart_lines c
            JOIN books b ON b.id = c.book_id
            WHERE c.user_id = $1 AND c.status = 'pending'
            ORDER BY c.book_id
            FOR UPDATE OF c, b
            "#,
        )
        .bind(user_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        into_entries(rows)
    }

    async fn create(con: &mut PgConnection, line: &CartLine) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO cart_lines (id, user_id, book_id, quantity, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(line.id().as_ref())
        .bind(line.user_id().as_ref())
        .bind(line.book_id().as_ref())
        .bind(line.quantity().as_ref())
        .bind(AsRef::<str>::as_ref(line.status()))
        .bind(line.created_at().as_ref())
        .execute(con)
        .await
        .convert_error()
        .map_err(|report| {
            // Only the one-pending-line-per-book index can clash on a fresh id.
            if matches!(report.current_context(), KernelError::Conflict(_)) {
                report
                    .change_context(KernelError::Concurrency)
                    .attach_printable("book was added to this cart by a concurrent request")
            } else {
                report
            }
        })?;
        Ok(())
    }

    async fn update_quantity(
        con: &mut PgConnection,
        line: &CartLine,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            UPDATE cart_lines
            SET quantity = $2
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(line.id().as_ref())
        .bind(line.quantity().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn complete(con: &mut PgConnection, line: &CartLine) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            UPDATE cart_lines
            SET status = 'completed'
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(line.id().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(error_stack::Report::new(KernelError::Concurrency)
                .attach_printable(format!("cart line {} is no longer pending", line.id().as_ref())));
        }
        Ok(())
    }

    async fn delete(
        con: &mut PgConnection,
        user_id: &UserId,
        id: &CartLineId,
    ) -> error_stack::Result<bool, KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            DELETE FROM cart_lines
            WHERE id = $1 AND user_id = $2 AND status = 'pending'
            "#,
        )
        .bind(id.as_ref())
        .bind(user_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod test {
    use application::service::{
        AddToCartService, CheckoutService, GetBookService, UpdateCartService, UpdateStockService,
    };
    use application::transfer::{
        AddToCartDto, CartUpdate, CheckoutDto, GetBookDto, RemoveCartLineDto, UpdateCartLineDto,
        UpdateStockDto,
    };
    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::CartQuery;
    use kernel::interface::update::CartModifier;
    use kernel::prelude::entity::{Book, CartLine, CartQuantity, CartStatus, User};
    use kernel::KernelError;

    use crate::database::postgres::cart::PostgresCartRepository;
    use crate::database::postgres::{fixture, PostgresDatabase};

    async fn stock_of(db: &PostgresDatabase, book: &Book) -> error_stack::Result<i32, KernelError> {
        let book = db
            .get_book(&GetBookDto {
                id: book.id().clone(),
            })
            .await?
            .expect("book exists");
        Ok(*book.stock().as_ref())
    }

    async fn add(
        db: &PostgresDatabase,
        user: &User,
        book: &Book,
        quantity: i32,
    ) -> error_stack::Result<CartLine, KernelError> {
        let entry = db
            .add_to_cart(AddToCartDto {
                user_id: user.id().clone(),
                book_id: book.id().clone(),
                quantity,
            })
            .await?;
        Ok(entry.line().clone())
    }

    async fn pending_lines(
        db: &PostgresDatabase,
        user: &User,
    ) -> error_stack::Result<Vec<CartLine>, KernelError> {
        let mut con = db.transact().await?;
        let pending = PostgresCartRepository.find_pending(&mut con, user.id()).await?;
        con.commit().await?;
        Ok(pending.into_iter().map(|entry| entry.line().clone()).collect())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let (user, book) = fixture::seed(&db, 10).await?;
        let mut con = db.transact().await?;

        let line = CartLine::pending(user.id().clone(), book.id().clone(), CartQuantity::new(2));
        PostgresCartRepository.create(&mut con, &line).await?;

        let found = PostgresCartRepository
            .find_pending_by_book(&mut con, user.id(), book.id())
            .await?;
        assert_eq!(found.as_ref().map(|l| l.id()), Some(line.id()));

        let entry = PostgresCartRepository
            .find_pending_by_id(&mut con, user.id(), line.id())
            .await?
            .expect("pending line");
        assert_eq!(entry.book().id(), book.id());
        assert_eq!(entry.subtotal(), 600);

        let mut completed = line.clone();
        completed.complete()?;
        PostgresCartRepository.complete(&mut con, &completed).await?;
        let report = PostgresCartRepository
            .complete(&mut con, &completed)
            .await
            .unwrap_err();
        assert!(matches!(report.current_context(), KernelError::Concurrency));

        let pending = PostgresCartRepository.find_pending(&mut con, user.id()).await?;
        assert!(pending.is_empty());
        assert!(!PostgresCartRepository
            .delete(&mut con, user.id(), line.id())
            .await?);
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn adding_twice_merges_into_one_line() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let (user, book) = fixture::seed(&db, 5).await?;

        let first = add(&db, &user, &book, 2).await?;
        let second = add(&db, &user, &book, 3).await?;
        assert_eq!(first.id(), second.id());

        let lines = pending_lines(&db, &user).await?;
        assert_eq!(lines.len(), 1);
        assert_eq!(*lines[0].quantity().as_ref(), 5);

        let report = add(&db, &user, &book, 1).await.unwrap_err();
        assert!(matches!(
            report.current_context(),
            KernelError::InsufficientStock(title) if title == book.title()
        ));
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn zero_quantity_removes_the_line() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let (user, book) = fixture::seed(&db, 5).await?;
        let line = add(&db, &user, &book, 2).await?;

        let updated = db
            .update_cart_line(UpdateCartLineDto {
                user_id: user.id().clone(),
                id: line.id().clone(),
                quantity: 4,
            })
            .await?;
        assert!(matches!(updated, CartUpdate::Updated(entry) if *entry.line().quantity().as_ref() == 4));

        let removed = db
            .update_cart_line(UpdateCartLineDto {
                user_id: user.id().clone(),
                id: line.id().clone(),
                quantity: 0,
            })
            .await?;
        assert_eq!(removed, CartUpdate::Removed);
        assert!(pending_lines(&db, &user).await?.is_empty());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn checkout_takes_stock_and_completes_lines() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let (user, first) = fixture::seed(&db, 5).await?;
        let (_, second) = fixture::seed(&db, 3).await?;
        add(&db, &user, &first, 5).await?;
        add(&db, &user, &second, 1).await?;

        let receipt = db
            .checkout(CheckoutDto {
                user_id: user.id().clone(),
            })
            .await?;
        assert_eq!(receipt.lines, 2);
        assert_eq!(receipt.total, 1800);

        assert_eq!(stock_of(&db, &first).await?, 0);
        assert_eq!(stock_of(&db, &second).await?, 2);
        assert!(pending_lines(&db, &user).await?.is_empty());

        let report = add(&db, &user, &first, 1).await.unwrap_err();
        assert!(matches!(
            report.current_context(),
            KernelError::InsufficientStock(_)
        ));
        assert_eq!(stock_of(&db, &first).await?, 0);
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn insufficient_line_rolls_back_everything() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let (user, plenty) = fixture::seed(&db, 10).await?;
        let (_, scarce) = fixture::seed(&db, 4).await?;
        add(&db, &user, &plenty, 2).await?;
        add(&db, &user, &scarce, 4).await?;

        // Another session drains the scarce book after it was carted.
        db.set_stock(UpdateStockDto {
            id: scarce.id().clone(),
            stock: 1,
        })
        .await?;

        let report = db
            .checkout(CheckoutDto {
                user_id: user.id().clone(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            report.current_context(),
            KernelError::InsufficientStock(title) if title == scarce.title()
        ));

        assert_eq!(stock_of(&db, &plenty).await?, 10);
        assert_eq!(stock_of(&db, &scarce).await?, 1);
        let pending = pending_lines(&db, &user).await?;
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|line| line.status() == &CartStatus::Pending));
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn empty_cart_is_rejected() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let (user, _) = fixture::seed(&db, 1).await?;
        let report = db
            .checkout(CheckoutDto {
                user_id: user.id().clone(),
            })
            .await
            .unwrap_err();
        assert!(matches!(report.current_context(), KernelError::EmptyCart));
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn concurrent_checkouts_never_oversell() -> error_stack::Result<(), KernelError> {
        let db = std::sync::Arc::new(PostgresDatabase::new().await?);
        let (alice, book) = fixture::seed(&db, 5).await?;
        let (bob, _) = fixture::seed(&db, 1).await?;
        add(&db, &alice, &book, 3).await?;
        add(&db, &bob, &book, 3).await?;

        let checkouts = [alice.id().clone(), bob.id().clone()].map(|user_id| {
            let db = db.clone();
            tokio::spawn(async move { db.checkout(CheckoutDto { user_id }).await })
        });
        let mut succeeded = 0;
        let mut rejected = 0;
        for handle in checkouts {
            match handle.await.expect("checkout task panicked") {
                Ok(_) => succeeded += 1,
                Err(report) => {
                    assert!(matches!(
                        report.current_context(),
                        KernelError::InsufficientStock(_)
                    ));
                    rejected += 1;
                }
            }
        }
        assert_eq!((succeeded, rejected), (1, 1));
        assert_eq!(stock_of(&db, &book).await?, 2);
        Ok(())
    }
    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn new_line_after_sellout_fails_checkout() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let (user, book) = fixture::seed(&db, 5).await?;
        add(&db, &user, &book, 5).await?;
        db.checkout(CheckoutDto {
            user_id: user.id().clone(),
        })
        .await?;
        assert_eq!(stock_of(&db, &book).await?, 0);

        // Bypasses the add-to-cart stock check.
        let mut con = db.transact().await?;
        let line = CartLine::pending(user.id().clone(), book.id().clone(), CartQuantity::new(1));
        PostgresCartRepository.create(&mut con, &line).await?;
        con.commit().await?;

        let report = db
            .checkout(CheckoutDto {
                user_id: user.id().clone(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            report.current_context(),
            KernelError::InsufficientStock(title) if title == book.title()
        ));
        assert_eq!(stock_of(&db, &book).await?, 0);
        let pending = pending_lines(&db, &user).await?;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id(), line.id());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn removing_needs_own_pending_line() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let (owner, book) = fixture::seed(&db, 5).await?;
        let (stranger, _) = fixture::seed(&db, 1).await?;
        let line = add(&db, &owner, &book, 1).await?;

        let report = db
            .remove_cart_line(RemoveCartLineDto {
                user_id: stranger.id().clone(),
                id: line.id().clone(),
            })
            .await
            .unwrap_err();
        assert!(matches!(report.current_context(), KernelError::NotFound(_)));
        assert_eq!(pending_lines(&db, &owner).await?.len(), 1);

        db.remove_cart_line(RemoveCartLineDto {
            user_id: owner.id().clone(),
            id: line.id().clone(),
        })
        .await?;
        assert!(pending_lines(&db, &owner).await?.is_empty());

        let ordered = add(&db, &owner, &book, 2).await?;
        db.checkout(CheckoutDto {
            user_id: owner.id().clone(),
        })
        .await?;
        let report = db
            .remove_cart_line(RemoveCartLineDto {
                user_id: owner.id().clone(),
                id: ordered.id().clone(),
            })
            .await
            .unwrap_err();
        assert!(matches!(report.current_context(), KernelError::NotFound(_)));
        assert_eq!(stock_of(&db, &book).await?, 3);
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn duplicate_pending_line_is_retryable() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let (user, book) = fixture::seed(&db, 5).await?;
        let mut con = db.transact().await?;

        let first = CartLine::pending(user.id().clone(), book.id().clone(), CartQuantity::new(1));
        PostgresCartRepository.create(&mut con, &first).await?;
        let second = CartLine::pending(user.id().clone(), book.id().clone(), CartQuantity::new(2));
        let report = PostgresCartRepository
            .create(&mut con, &second)
            .await
            .unwrap_err();
        assert!(matches!(report.current_context(), KernelError::Concurrency));
        assert!(report.current_context().is_transient());
        Ok(())
    }
}
