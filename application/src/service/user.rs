use error_stack::Report;
use time::OffsetDateTime;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    DependOnOrderQuery, DependOnSessionQuery, DependOnUserQuery, OrderQuery, SessionQuery,
    UserQuery,
};
use kernel::interface::update::{
    DependOnSessionModifier, DependOnUserModifier, SessionModifier, UserModifier,
};
use kernel::prelude::entity::{
    AdminAuthenticated, CreatedAt, IsAdmin, Session, User, UserId, UserName, UserSummary,
};
use kernel::KernelError;

use crate::password::{hash_password, verify_password};
use crate::transfer::{
    AuthenticateDto, DeleteUserDto, GetAllUserDto, GetUserDto, LoginDto, LogoutDto, RegisterDto,
    UserDetail,
};

const MIN_PASSWORD_LENGTH: usize = 6;

/// Names are stored and looked up without surrounding whitespace.
fn user_name(raw: &str) -> UserName {
    UserName::new(raw.trim())
}

fn validate_registration(dto: &RegisterDto) -> error_stack::Result<(), KernelError> {
    if dto.name.trim().is_empty() || dto.password.is_empty() {
        return Err(Report::new(KernelError::Validation(
            "Username and password are required".to_string(),
        )));
    }
    if dto.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Report::new(KernelError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ))));
    }
    Ok(())
}

fn check_credentials(user: Option<User>, password: &str) -> error_stack::Result<User, KernelError> {
    let user = user.ok_or_else(|| Report::new(KernelError::InvalidCredentials))?;
    if !verify_password(user.password(), password)? {
        return Err(Report::new(KernelError::InvalidCredentials)
            .attach_printable(format!("wrong password for {}", user.name().as_ref())));
    }
    Ok(user)
}

#[async_trait::async_trait]
pub trait RegisterService:
    'static + Sync + Send + DependOnUserQuery + DependOnUserModifier + DependOnSessionModifier
{
    /// The first account ever registered becomes the admin.
    async fn register(&self, dto: RegisterDto) -> error_stack::Result<Session, KernelError> {
        validate_registration(&dto)?;
        let name = user_name(&dto.name);

        let mut connection = self.database_connection().transact().await?;
        // Held until commit so concurrent registrations see each other.
        self.user_modifier().lock_registrations(&mut connection).await?;
        if self
            .user_query()
            .find_by_name(&mut connection, &name)
            .await?
            .is_some()
        {
            return Err(Report::new(KernelError::Conflict("Username already exists")));
        }
        let is_admin = self.user_query().count(&mut connection).await? == 0;

        let user = User::new(
            UserId::default(),
            name,
            hash_password(&dto.password)?,
            IsAdmin::new(is_admin),
            CreatedAt::now(),
        );
        self.user_modifier().create(&mut connection, &user).await?;

        let session = Session::issue(&user, AdminAuthenticated::new(false));
        self.session_modifier()
            .create(&mut connection, &session)
            .await?;
        connection.commit().await?;

        tracing::info!(user = %user.id().as_ref(), is_admin, "user registered");
        Ok(session)
    }
}

impl<T> RegisterService for T where
    T: DependOnUserQuery + DependOnUserModifier + DependOnSessionModifier
{
}

#[async_trait::async_trait]
pub trait LoginService:
    'static + Sync + Send + DependOnUserQuery + DependOnSessionModifier
{
    async fn login(&self, dto: LoginDto) -> error_stack::Result<Session, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let user = self
            .user_query()
            .find_by_name(&mut connection, &user_name(&dto.name))
            .await?;
        let user = check_credentials(user, &dto.password)?;

        let session = Session::issue(&user, AdminAuthenticated::new(false));
        self.session_modifier()
            .create(&mut connection, &session)
            .await?;
        connection.commit().await?;
        Ok(session)
    }

    /// Same credentials as `login`, but only admins get through and the session
    /// carries the admin-authenticated flag.
    async fn admin_login(&self, dto: LoginDto) -> error_stack::Result<Session, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let user = self
            .user_query()
            .find_by_name(&mut connection, &user_name(&dto.name))
            .await?
            .filter(|user| *user.is_admin().as_ref());
        let user = check_credentials(user, &dto.password)?;

        let session = Session::issue(&user, AdminAuthenticated::new(true));
        self.session_modifier()
            .create(&mut connection, &session)
            .await?;
        connection.commit().await?;

        tracing::info!(user = %user.id().as_ref(), "admin login");
        Ok(session)
    }
}

impl<T> LoginService for T where T: DependOnUserQuery + DependOnSessionModifier {}

#[async_trait::async_trait]
pub trait AuthenticateService:
    'static + Sync + Send + DependOnSessionQuery + DependOnSessionModifier
{
    async fn authenticate(&self, dto: AuthenticateDto) -> error_stack::Result<Session, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let session = self
            .session_query()
            .find_by_token(&mut connection, &dto.token)
            .await?
            .ok_or_else(|| Report::new(KernelError::InvalidToken))?;

        if session.is_expired(OffsetDateTime::now_utc()) {
            self.session_modifier()
                .delete(&mut connection, &dto.token)
                .await?;
            connection.commit().await?;
            return Err(Report::new(KernelError::InvalidToken).attach_printable("session expired"));
        }
        connection.commit().await?;
        Ok(session)
    }

    async fn logout(&self, dto: LogoutDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;
        self.session_modifier()
            .delete(&mut connection, &dto.token)
            .await?;
        connection.commit().await?;
        Ok(())
    }
}

impl<T> AuthenticateService for T where T: DependOnSessionQuery + DependOnSessionModifier {}

#[async_trait::async_trait]
pub trait GetUserService: 'static + Sync + Send + DependOnUserQuery + DependOnOrderQuery {
    async fn count_users(&self) -> error_stack::Result<i64, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let count = self.user_query().count(&mut connection).await?;
        connection.commit().await?;
        Ok(count)
    }

    async fn get_all_users(
        &self,
        dto: &GetAllUserDto,
    ) -> error_stack::Result<Vec<UserSummary>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let users = self
            .user_query()
            .find_summaries(&mut connection, &dto.limit, &dto.offset)
            .await?;
        connection.commit().await?;
        Ok(users)
    }

    async fn get_user(&self, dto: &GetUserDto) -> error_stack::Result<Option<UserDetail>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let Some(summary) = self
            .user_query()
            .find_summary_by_id(&mut connection, &dto.id)
            .await?
        else {
            return Ok(None);
        };
        let orders = self
            .order_query()
            .find_by_user(&mut connection, &dto.id)
            .await?;
        connection.commit().await?;
        Ok(Some(UserDetail { summary, orders }))
    }
}

impl<T> GetUserService for T where T: DependOnUserQuery + DependOnOrderQuery {}

#[async_trait::async_trait]
pub trait DeleteUserService: 'static + Sync + Send + DependOnUserModifier {
    async fn delete_user(&self, dto: DeleteUserDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let deleted = self.user_modifier().delete(&mut connection, &dto.id).await?;
        if !deleted {
            return Err(Report::new(KernelError::NotFound("User")));
        }
        connection.commit().await?;
        tracing::info!(user = %dto.id.as_ref(), "user deleted");
        Ok(())
    }
}

impl<T> DeleteUserService for T where T: DependOnUserModifier {}
