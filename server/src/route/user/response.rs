use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use kernel::prelude::entity::{
    AdminAuthenticated, DestructSession, IsAdmin, Session, SessionToken, UserId, UserName,
};

use crate::controller::Exhaust;
use crate::route::message;

/// A session handed out by registration rather than login.
pub struct Registered(pub Session);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUserResponse {
    id: UserId,
    username: UserName,
    is_admin: IsAdmin,
    admin_authenticated: AdminAuthenticated,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    token: SessionToken,
    user: SessionUserResponse,
}

impl SessionResponse {
    fn new(session: Session, message: Option<&'static str>) -> Self {
        let DestructSession {
            token,
            user_id,
            user_name,
            is_admin,
            admin_authenticated,
            ..
        } = session.into_destruct();
        Self {
            message,
            token,
            user: SessionUserResponse {
                id: user_id,
                username: user_name,
                is_admin,
                admin_authenticated,
            },
        }
    }
}

pub struct Presenter;

impl Exhaust<Session> for Presenter {
    type To = Json<SessionResponse>;
    fn emit(&self, input: Session) -> Self::To {
        Json(SessionResponse::new(input, None))
    }
}

impl Exhaust<Registered> for Presenter {
    type To = Response;
    fn emit(&self, input: Registered) -> Self::To {
        let body = SessionResponse::new(input.0, Some("User created successfully"));
        (StatusCode::CREATED, Json(body)).into_response()
    }
}

impl Exhaust<()> for Presenter {
    type To = Json<Value>;
    fn emit(&self, _: ()) -> Self::To {
        message("Logged out")
    }
}

impl Exhaust<i64> for Presenter {
    type To = Json<Value>;
    fn emit(&self, input: i64) -> Self::To {
        Json(json!({ "count": input }))
    }
}
