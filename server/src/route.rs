use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::handler::AppModule;

pub use self::{admin::*, book::*, cart::*, user::*};

mod admin;
mod book;
mod cart;
mod user;

pub trait HealthRouter {
    fn route_health(self) -> Self;
}

impl HealthRouter for Router<AppModule> {
    fn route_health(self) -> Self {
        self.route(
            "/",
            get(|| async { Json::<Value>(json!({ "message": "BookStore API is running" })) }),
        )
    }
}

/// A plain `{ "message": ... }` acknowledgement.
pub(crate) fn message(text: &'static str) -> Json<Value> {
    Json(json!({ "message": text }))
}
