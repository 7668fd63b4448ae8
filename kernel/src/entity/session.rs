mod expires_at;
mod token;

pub use self::{expires_at::*, token::*};
use crate::entity::{IsAdmin, User, UserId, UserName};
use crate::KernelError;
use destructure::Destructure;
use error_stack::Report;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use vodca::{AsRefln, Fromln, References};

pub const SESSION_LIFETIME: Duration = Duration::hours(24);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct AdminAuthenticated(bool);

impl AdminAuthenticated {
    pub fn new(value: impl Into<bool>) -> Self {
        Self(value.into())
    }
}

/// A bearer token and the identity it stands for.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Session {
    token: SessionToken,
    user_id: UserId,
    user_name: UserName,
    is_admin: IsAdmin,
    admin_authenticated: AdminAuthenticated,
    expires_at: ExpiresAt,
}

impl Session {
    pub fn new(
        token: SessionToken,
        user_id: UserId,
        user_name: UserName,
        is_admin: IsAdmin,
        admin_authenticated: AdminAuthenticated,
        expires_at: ExpiresAt,
    ) -> Self {
        Self {
            token,
            user_id,
            user_name,
            is_admin,
            admin_authenticated,
            expires_at,
        }
    }

    pub fn issue(user: &User, admin_authenticated: AdminAuthenticated) -> Self {
        Self::new(
            SessionToken::default(),
            user.id().clone(),
            user.name().clone(),
            *user.is_admin(),
            admin_authenticated,
            ExpiresAt::after(SESSION_LIFETIME),
        )
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at.is_before(now)
    }

    pub fn is_admin_authenticated(&self) -> bool {
        *self.is_admin.as_ref() && *self.admin_authenticated.as_ref()
    }

    pub fn require_admin(&self) -> error_stack::Result<(), KernelError> {
        if self.is_admin_authenticated() {
            Ok(())
        } else {
            Err(Report::new(KernelError::Forbidden)
                .attach_printable(format!("user {} is not admin-authenticated", self.user_name.as_ref())))
        }
    }
}

#[cfg(test)]
mod test {
    use time::{Duration, OffsetDateTime};

    use crate::entity::{
        AdminAuthenticated, CreatedAt, IsAdmin, PasswordHash, Session, User, UserId, UserName,
    };
    use crate::KernelError;

    fn user(is_admin: bool) -> User {
        User::new(
            UserId::default(),
            UserName::new("reader"),
            PasswordHash::new("$argon2id$stub"),
            IsAdmin::new(is_admin),
            CreatedAt::now(),
        )
    }

    #[test]
    fn admin_gate_needs_role_and_admin_login() {
        let plain_admin = Session::issue(&user(true), AdminAuthenticated::new(false));
        assert!(!plain_admin.is_admin_authenticated());
        let report = plain_admin.require_admin().unwrap_err();
        assert!(matches!(report.current_context(), KernelError::Forbidden));

        let admin = Session::issue(&user(true), AdminAuthenticated::new(true));
        assert!(admin.require_admin().is_ok());

        let reader = Session::issue(&user(false), AdminAuthenticated::new(true));
        assert!(reader.require_admin().is_err());
    }

    #[test]
    fn expires_after_lifetime() {
        let session = Session::issue(&user(false), AdminAuthenticated::new(false));
        let now = OffsetDateTime::now_utc();
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::hours(25)));
    }
}
