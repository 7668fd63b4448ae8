use axum::extract::{Path, Query, State};
use axum::routing::{get, patch};
use axum::{Json, Router};
use error_stack::Report;
use uuid::Uuid;

use application::service::{
    CreateBookService, DeleteBookService, GetBookService, UpdateStockService,
};
use kernel::KernelError;

use crate::auth::Administrator;
use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;

use self::request::{
    CreateRequest, DeleteRequest, GetAllRequest, GetRequest, StockRequest, TakeRequest,
    Transformer,
};
use self::response::Presenter;

mod request;
mod response;

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl BookRouter for Router<AppModule> {
    fn route_book(self) -> Self {
        self.route(
            "/books",
            get(
                |State(module): State<AppModule>, Query(req): Query<GetAllRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(req)
                        .handle(|dto| async move { module.database().get_all_books(&dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 _: Administrator,
                 Json(req): Json<CreateRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(req)
                        .handle(|dto| async move { module.database().create_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(GetRequest::new(id))
                        .handle(|dto| async move { module.database().get_book(&dto).await })
                        .await
                        .and_then(|book| {
                            book.ok_or_else(|| Report::new(KernelError::NotFound("Book")))
                        })
                        .map_err(ErrorStatus::from)
                },
            )
            .patch(
                |State(module): State<AppModule>, _: Administrator, Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(TakeRequest::new(id))
                        .handle(|dto| async move { module.database().take_one(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>, _: Administrator, Path(id): Path<Uuid>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake(DeleteRequest::new(id))
                        .handle(|dto| async move { module.database().delete_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/books/:id/stock",
            patch(
                |State(module): State<AppModule>,
                 _: Administrator,
                 Path(id): Path<Uuid>,
                 Json(req): Json<StockRequest>| async move {
                    Controller::new(Transformer, Presenter)
                        .intake((id, req))
                        .handle(|dto| async move { module.database().set_stock(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
