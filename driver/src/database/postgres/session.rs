use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::SessionQuery;
use kernel::interface::update::SessionModifier;
use kernel::prelude::entity::{
    AdminAuthenticated, ExpiresAt, IsAdmin, Session, SessionToken, UserId, UserName,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresSessionRepository;

#[async_trait::async_trait]
impl SessionQuery for PostgresSessionRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_token(
        &self,
        con: &mut PostgresTransaction,
        token: &SessionToken,
    ) -> error_stack::Result<Option<Session>, KernelError> {
        PgSessionInternal::find_by_token(con, token).await
    }
}

#[async_trait::async_trait]
impl SessionModifier for PostgresSessionRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        session: &Session,
    ) -> error_stack::Result<(), KernelError> {
        PgSessionInternal::create(con, session).await
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        token: &SessionToken,
    ) -> error_stack::Result<(), KernelError> {
        PgSessionInternal::delete(con, token).await
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    token: Uuid,
    user_id: Uuid,
    user_name: String,
    is_admin: bool,
    admin_authenticated: bool,
    expires_at: OffsetDateTime,
}

impl From<SessionRow> for Session {
    fn from(value: SessionRow) -> Self {
        Session::new(
            SessionToken::new(value.token),
            UserId::new(value.user_id),
            UserName::new(value.user_name),
            IsAdmin::new(value.is_admin),
            AdminAuthenticated::new(value.admin_authenticated),
            ExpiresAt::new(value.expires_at),
        )
    }
}

pub(in crate::database) struct PgSessionInternal;

impl PgSessionInternal {
    async fn find_by_token(
        con: &mut PgConnection,
        token: &SessionToken,
    ) -> error_stack::Result<Option<Session>, KernelError> {
        let row = sqlx::query_as::<_, SessionRow>(
            // language=postgresql
            r#"
            SELECT s.token, s.user_id, u.name AS user_name, u.is_admin,
                   s.admin_authenticated, s.expires_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1
            "#,
        )
        .bind(token.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Session::from))
    }

    async fn create(con: &mut PgConnection, session: &Session) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, admin_authenticated, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session.token().as_ref())
        .bind(session.user_id().as_ref())
        .bind(session.admin_authenticated().as_ref())
        .bind(session.expires_at().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn delete(con: &mut PgConnection, token: &SessionToken) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE token = $1
            "#,
        )
        .bind(token.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use time::Duration;

    use application::password::hash_password;
    use application::service::{AuthenticateService, LoginService, RegisterService};
    use application::transfer::{AuthenticateDto, LoginDto, LogoutDto, RegisterDto};
    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::SessionQuery;
    use kernel::interface::update::{SessionModifier, UserModifier};
    use kernel::prelude::entity::{
        AdminAuthenticated, CreatedAt, ExpiresAt, IsAdmin, Session, SessionToken, User, UserId,
        UserName,
    };
    use kernel::KernelError;

    use crate::database::postgres::session::PostgresSessionRepository;
    use crate::database::postgres::{fixture, PostgresDatabase, PostgresUserRepository};

    fn login(name: &str) -> LoginDto {
        LoginDto {
            name: name.to_string(),
            password: "secret-pass".to_string(),
        }
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let (user, _) = fixture::seed(&db, 1).await?;
        let mut con = db.transact().await?;

        let session = Session::issue(&user, AdminAuthenticated::new(false));
        PostgresSessionRepository.create(&mut con, &session).await?;
        let found = PostgresSessionRepository
            .find_by_token(&mut con, session.token())
            .await?;
        assert_eq!(found.as_ref().map(|s| s.user_id()), Some(user.id()));

        PostgresSessionRepository.delete(&mut con, session.token()).await?;
        let found = PostgresSessionRepository
            .find_by_token(&mut con, session.token())
            .await?;
        assert!(found.is_none());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn expired_session_is_rejected_and_removed() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let (user, _) = fixture::seed(&db, 1).await?;
        let expired = Session::new(
            SessionToken::default(),
            user.id().clone(),
            user.name().clone(),
            *user.is_admin(),
            AdminAuthenticated::new(false),
            ExpiresAt::after(-Duration::minutes(1)),
        );

        let mut con = db.transact().await?;
        PostgresSessionRepository.create(&mut con, &expired).await?;
        con.commit().await?;

        let report = db
            .authenticate(AuthenticateDto {
                token: expired.token().clone(),
            })
            .await
            .unwrap_err();
        assert!(matches!(report.current_context(), KernelError::InvalidToken));

        let mut con = db.transact().await?;
        let found = PostgresSessionRepository
            .find_by_token(&mut con, expired.token())
            .await?;
        assert!(found.is_none());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn login_then_logout() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let name = format!("reader-{}", uuid::Uuid::new_v4());
        db.register(RegisterDto {
            name: name.clone(),
            password: "secret-pass".to_string(),
        })
        .await?;

        let report = db
            .login(LoginDto {
                name: name.clone(),
                password: "wrong-pass".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            report.current_context(),
            KernelError::InvalidCredentials
        ));

        let session = db
            .login(LoginDto {
                name,
                password: "secret-pass".to_string(),
            })
            .await?;
        assert!(!session.is_admin_authenticated());
        let token = session.token().clone();
        let found = db
            .authenticate(AuthenticateDto {
                token: token.clone(),
            })
            .await?;
        assert_eq!(found.user_id(), session.user_id());

        db.logout(LogoutDto {
            token: token.clone(),
        })
        .await?;
        let report = db.authenticate(AuthenticateDto { token }).await.unwrap_err();
        assert!(matches!(report.current_context(), KernelError::InvalidToken));
        Ok(())
    }
    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn admin_login_turns_away_readers() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let reader_name = format!("reader-{}", uuid::Uuid::new_v4());
        let admin_name = format!("admin-{}", uuid::Uuid::new_v4());
        let account = |name: &str, is_admin: bool| -> error_stack::Result<User, KernelError> {
            Ok(User::new(
                UserId::default(),
                UserName::new(name),
                hash_password("secret-pass")?,
                IsAdmin::new(is_admin),
                CreatedAt::now(),
            ))
        };
        let reader = account(&reader_name, false)?;
        let admin = account(&admin_name, true)?;
        let mut con = db.transact().await?;
        PostgresUserRepository.create(&mut con, &reader).await?;
        PostgresUserRepository.create(&mut con, &admin).await?;
        con.commit().await?;

        let report = db
            .admin_login(login(&reader_name))
            .await
            .unwrap_err();
        assert!(matches!(
            report.current_context(),
            KernelError::InvalidCredentials
        ));

        let session = db.admin_login(login(&admin_name)).await?;
        assert!(session.is_admin_authenticated());
        assert!(session.require_admin().is_ok());

        let session = db.login(login(&admin_name)).await?;
        assert!(!session.is_admin_authenticated());
        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn padded_name_still_logs_in() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let name = format!("reader-{}", uuid::Uuid::new_v4());
        let padded = format!("  {} ", name);
        db.register(RegisterDto {
            name: padded.clone(),
            password: "secret-pass".to_string(),
        })
        .await?;

        let session = db.login(login(&padded)).await?;
        assert_eq!(session.user_name(), &UserName::new(name.clone()));
        db.login(login(&name)).await?;
        Ok(())
    }
}
