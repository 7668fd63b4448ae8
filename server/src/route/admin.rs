use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Router;
use error_stack::Report;
use uuid::Uuid;

use application::service::{DeleteUserService, GetOrderService, GetUserService};
use kernel::KernelError;

use crate::auth::Administrator;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;

use self::request::{
    DeleteUserRequest, GetOrderRequest, GetUserRequest, OrdersRequest, PageRequest,
    Transformer, UsersRequest,
};
use self::response::Presenter;

mod request;
mod response;

/// Dashboard endpoints. Every one of them needs an admin-authenticated session.
pub trait AdminRouter {
    fn route_admin(self) -> Self;
}

impl AdminRouter for Router<AppModule> {
    fn route_admin(self) -> Self {
        self.route(
            "/admin/users",
            get(
                |State(module): State<AppModule>,
                 _: Administrator,
                 Query(req): Query<PageRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(UsersRequest::new(req))
                        .handle(|dto| async move { module.database().get_all_users(&dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/admin/users/:id",
            get(
                |State(module): State<AppModule>, _: Administrator, Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(GetUserRequest::new(id))
                        .handle(|dto| async move { module.database().get_user(&dto).await })
                        .await
                        .and_then(|user| {
                            user.ok_or_else(|| Report::new(KernelError::NotFound("User")))
                        })
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>, _: Administrator, Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(DeleteUserRequest::new(id))
                        .handle(|dto| async move { module.database().delete_user(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/admin/orders",
            get(
                |State(module): State<AppModule>,
                 _: Administrator,
                 Query(req): Query<PageRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(OrdersRequest::new(req))
                        .handle(|dto| async move { module.database().get_all_orders(&dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/admin/orders/:id",
            get(
                |State(module): State<AppModule>, _: Administrator, Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(GetOrderRequest::new(id))
                        .handle(|dto| async move { module.database().get_order(&dto).await })
                        .await
                        .and_then(|order| {
                            order.ok_or_else(|| Report::new(KernelError::NotFound("Order")))
                        })
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
