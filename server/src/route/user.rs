use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use application::service::{AuthenticateService, GetUserService, LoginService, RegisterService};

use crate::auth::Authenticated;
use crate::controller::{Controller, Exhaust};
use crate::error::ErrorStatus;
use crate::handler::AppModule;

use self::request::{LoginRequest, LogoutRequest, RegisterRequest, Transformer};
use self::response::{Presenter, Registered};

mod request;
mod response;

pub trait UserRouter {
    fn route_user(self) -> Self;
}

impl UserRouter for Router<AppModule> {
    fn route_user(self) -> Self {
        self.route(
            "/register",
            post(
                |State(module): State<AppModule>, Json(req): Json<RegisterRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(req)
                        .handle(|dto| async move {
                            module.database().register(dto).await.map(Registered)
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/login",
            post(
                |State(module): State<AppModule>, Json(req): Json<LoginRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .try_intake(req)?
                        .handle(|dto| async move { module.database().login(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/admin/login",
            post(
                |State(module): State<AppModule>, Json(req): Json<LoginRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .try_intake(req)?
                        .handle(|dto| async move { module.database().admin_login(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/logout",
            post(
                |State(module): State<AppModule>, Authenticated(session): Authenticated| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(LogoutRequest::new(session.token().clone()))
                        .handle(|dto| async move { module.database().logout(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/users/count",
            get(|State(module): State<AppModule>| async move {
                module
                    .database()
                    .count_users()
                    .await
                    .map(|count| Presenter.emit(count))
                    .map_err(ErrorStatus::from)
            }),
        )
    }
}
