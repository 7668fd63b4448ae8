use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use kernel::prelude::entity::{
    Book, BookAuthor, BookId, BookImage, BookPrice, BookStock, BookTitle, CreatedAt, DestructBook,
};

use crate::controller::Exhaust;
use crate::route::message;

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    id: BookId,
}

impl IntoResponse for CreatedResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    id: BookId,
    title: BookTitle,
    author: BookAuthor,
    price: BookPrice,
    stock: BookStock,
    image: BookImage,
    created_at: CreatedAt<Book>,
}

impl From<Book> for BookResponse {
    fn from(value: Book) -> Self {
        let DestructBook {
            id,
            title,
            author,
            price,
            stock,
            image,
            created_at,
        } = value.into_destruct();
        Self {
            id,
            title,
            author,
            price,
            stock,
            image,
            created_at,
        }
    }
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub struct Presenter;

impl Exhaust<BookId> for Presenter {
    type To = CreatedResponse;
    fn emit(&self, input: BookId) -> Self::To {
        CreatedResponse { id: input }
    }
}

impl Exhaust<Book> for Presenter {
    type To = BookResponse;
    fn emit(&self, input: Book) -> Self::To {
        BookResponse::from(input)
    }
}

impl Exhaust<Option<Book>> for Presenter {
    type To = Option<BookResponse>;
    fn emit(&self, input: Option<Book>) -> Self::To {
        input.map(BookResponse::from)
    }
}

impl Exhaust<Vec<Book>> for Presenter {
    type To = Json<Vec<BookResponse>>;
    fn emit(&self, input: Vec<Book>) -> Self::To {
        Json(input.into_iter().map(BookResponse::from).collect())
    }
}

impl Exhaust<()> for Presenter {
    type To = Json<Value>;
    fn emit(&self, _: ()) -> Self::To {
        message("Book deleted successfully")
    }
}
