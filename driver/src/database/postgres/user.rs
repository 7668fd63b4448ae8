use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::UserQuery;
use kernel::interface::update::UserModifier;
use kernel::prelude::entity::{
    CreatedAt, IsAdmin, PasswordHash, SelectLimit, SelectOffset, User, UserId, UserName,
    UserSummary,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresUserRepository;

#[async_trait::async_trait]
impl UserQuery for PostgresUserRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        PgUserInternal::find_by_id(con, id).await
    }

    async fn find_by_name(
        &self,
        con: &mut PostgresTransaction,
        name: &UserName,
    ) -> error_stack::Result<Option<User>, KernelError> {
        PgUserInternal::find_by_name(con, name).await
    }

    async fn count(&self, con: &mut PostgresTransaction) -> error_stack::Result<i64, KernelError> {
        PgUserInternal::count(con).await
    }

    async fn find_summaries(
        &self,
        con: &mut PostgresTransaction,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<UserSummary>, KernelError> {
        PgUserInternal::find_summaries(con, limit, offset).await
    }

    async fn find_summary_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &UserId,
    ) -> error_stack::Result<Option<UserSummary>, KernelError> {
        PgUserInternal::find_summary_by_id(con, id).await
    }
}

#[async_trait::async_trait]
impl UserModifier for PostgresUserRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        user: &User,
    ) -> error_stack::Result<(), KernelError> {
        PgUserInternal::create(con, user).await
    }

    async fn lock_registrations(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<(), KernelError> {
        PgUserInternal::lock_registrations(con).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
    ) -> error_stack::Result<bool, KernelError> {
        PgUserInternal::delete(con, user_id).await
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    password_hash: String,
    is_admin: bool,
    created_at: OffsetDateTime,
}

impl From<UserRow> for User {
    fn from(value: UserRow) -> Self {
        User::new(
            UserId::new(value.id),
            UserName::new(value.name),
            PasswordHash::new(value.password_hash),
            IsAdmin::new(value.is_admin),
            CreatedAt::new(value.created_at),
        )
    }
}

#[derive(sqlx::FromRow)]
struct UserSummaryRow {
    id: Uuid,
    name: String,
    is_admin: bool,
    created_at: OffsetDateTime,
    total_orders: i64,
    total_spent: i64,
}

impl From<UserSummaryRow> for UserSummary {
    fn from(value: UserSummaryRow) -> Self {
        UserSummary::new(
            UserId::new(value.id),
            UserName::new(value.name),
            IsAdmin::new(value.is_admin),
            CreatedAt::new(value.created_at),
            value.total_orders,
            value.total_spent,
        )
    }
}

pub(in crate::database) struct PgUserInternal;

impl PgUserInternal {
    async fn find_by_id(con: &mut PgConnection, id: &UserId) -> error_stack::Result<Option<User>, KernelError> {
        let row = sqlx::query_as::<_, UserRow>(
            // language=postgresql
            r#"
            SELECT id, name, password_hash, is_admin, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(User::from))
    }

    async fn find_by_name(
        con: &mut PgConnection,
        name: &UserName,
    ) -> error_stack::Result<Option<User>, KernelError> {
        let row = sqlx::query_as::<_, UserRow>(
            // language=postgresql
            r#"
            SELECT id, name, password_hash, is_admin, created_at
            FROM users
            WHERE name = $1
            "#,
        )
        .bind(name.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(User::from))
    }

    async fn count(con: &mut PgConnection) -> error_stack::Result<i64, KernelError> {
        // language=postgresql
        let (count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM users")
            .fetch_one(con)
            .await
            .convert_error()?;
        Ok(count)
    }

    async fn find_summaries(
        con: &mut PgConnection,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<UserSummary>, KernelError> {
        let rows = sqlx::query_as::<_, UserSummaryRow>(
            // language=postgresql
            r#"
            SELECT u.id, u.name, u.is_admin, u.created_at,
                   COUNT(c.id) AS total_orders,
                   COALESCE(SUM(b.price::BIGINT * c.quantity), 0)::BIGINT AS total_spent
            FROM users u
            LEFT JOIN cart_lines c ON c.user_id = u.id
            LEFT JOIN books b ON b.id = c.book_id
            GROUP BY u.id
            ORDER BY u.created_at DESC, u.id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit.as_ref())
        .bind(offset.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(UserSummary::from).collect())
    }

    async fn find_summary_by_id(
        con: &mut PgConnection,
        id: &UserId,
    ) -> error_stack::Result<Option<UserSummary>, KernelError> {
        let row = sqlx::query_as::<_, UserSummaryRow>(
            // language=postgresql
            r#"
            SELECT u.id, u.name, u.is_admin, u.created_at,
                   COUNT(c.id) AS total_orders,
                   COALESCE(SUM(b.price::BIGINT * c.quantity), 0)::BIGINT AS total_spent
            FROM users u
            LEFT JOIN cart_lines c ON c.user_id = u.id
            LEFT JOIN books b ON b.id = c.book_id
            WHERE u.id = $1
            GROUP BY u.id
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(UserSummary::from))
    }

    async fn create(con: &mut PgConnection, user: &User) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO users (id, name, password_hash, is_admin, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id().as_ref())
        .bind(user.name().as_ref())
        .bind(user.password().as_ref())
        .bind(user.is_admin().as_ref())
        .bind(user.created_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn lock_registrations(con: &mut PgConnection) -> error_stack::Result<(), KernelError> {
        // SHARE ROW EXCLUSIVE conflicts with itself but not with readers.
        // language=postgresql
        sqlx::query("LOCK TABLE users IN SHARE ROW EXCLUSIVE MODE")
            .execute(con)
            .await
            .convert_error()?;
        Ok(())
    }

    async fn delete(con: &mut PgConnection, user_id: &UserId) -> error_stack::Result<bool, KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(result.rows_affected() > 0)
    }
}
