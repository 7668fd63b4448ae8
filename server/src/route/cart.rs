use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use uuid::Uuid;

use application::service::{
    AddToCartService, CheckoutService, GetCartService, UpdateCartService,
};

use crate::auth::Authenticated;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;

use self::request::{AddRequest, CheckoutRequest, RemoveRequest, Transformer, UpdateRequest};
use self::response::Presenter;

mod request;
mod response;

pub trait CartRouter {
    fn route_cart(self) -> Self;
}

impl CartRouter for Router<AppModule> {
    fn route_cart(self) -> Self {
        self.route(
            "/cart",
            get(
                |State(module): State<AppModule>, Authenticated(session): Authenticated| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(session.user_id().clone())
                        .handle(|dto| async move { module.database().get_cart(&dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 Authenticated(session): Authenticated,
                 Json(req): Json<AddRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((session.user_id().clone(), req))
                        .handle(|dto| async move { module.database().add_to_cart(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/cart/:id",
            patch(
                |State(module): State<AppModule>,
                 Authenticated(session): Authenticated,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((session.user_id().clone(), id, req))
                        .handle(|dto| async move { module.database().update_cart_line(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>,
                 Authenticated(session): Authenticated,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(RemoveRequest::new(session.user_id().clone(), id))
                        .handle(|dto| async move { module.database().remove_cart_line(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/cart/checkout",
            post(
                |State(module): State<AppModule>, Authenticated(session): Authenticated| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(CheckoutRequest::new(session.user_id().clone()))
                        .handle(|dto| async move { module.database().checkout(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
