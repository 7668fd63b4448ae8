use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use error_stack::{Report, ResultExt};
use uuid::Uuid;

use application::service::AuthenticateService;
use application::transfer::AuthenticateDto;
use kernel::prelude::entity::{Session, SessionToken};
use kernel::KernelError;

use crate::error::ErrorStatus;
use crate::handler::AppModule;

/// Reads the bearer token. A missing or malformed header is `Unauthorized`,
/// a token that is not one of ours is `InvalidToken`.
async fn bearer_token(
    parts: &mut Parts,
    state: &AppModule,
) -> error_stack::Result<SessionToken, KernelError> {
    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                Report::new(KernelError::Unauthorized).attach_printable(format!("{:?}", rejection))
            })?;
    let token = Uuid::parse_str(bearer.token())
        .change_context(KernelError::InvalidToken)
        .attach_printable("bearer token is not a session token")?;
    Ok(SessionToken::new(token))
}

/// A caller holding a live session.
pub struct Authenticated(pub Session);

#[async_trait]
impl FromRequestParts<AppModule> for Authenticated {
    type Rejection = ErrorStatus;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppModule,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state).await?;
        let session = state
            .database()
            .authenticate(AuthenticateDto { token })
            .await?;
        Ok(Self(session))
    }
}

/// An admin who came in through the admin login.
pub struct Administrator(pub Session);

#[async_trait]
impl FromRequestParts<AppModule> for Administrator {
    type Rejection = ErrorStatus;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppModule,
    ) -> Result<Self, Self::Rejection> {
        let Authenticated(session) = Authenticated::from_request_parts(parts, state).await?;
        session.require_admin()?;
        Ok(Self(session))
    }
}
