use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use application::transfer::{CartUpdate, CheckoutReceipt};
use kernel::prelude::entity::{
    BookAuthor, BookId, BookImage, BookPrice, BookTitle, CartEntry, CartLine, CartLineId,
    CartQuantity, CartStatus, CreatedAt, DestructBook, DestructCartEntry, DestructCartLine,
};

use crate::controller::Exhaust;
use crate::route::message;

const REMOVED: &str = "Item removed from cart";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartBookResponse {
    id: BookId,
    title: BookTitle,
    author: BookAuthor,
    price: BookPrice,
    image: BookImage,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    id: CartLineId,
    quantity: CartQuantity,
    status: CartStatus,
    subtotal: i64,
    created_at: CreatedAt<CartLine>,
    book: CartBookResponse,
}

impl From<CartEntry> for CartItemResponse {
    fn from(value: CartEntry) -> Self {
        let subtotal = value.subtotal();
        let DestructCartEntry { line, book } = value.into_destruct();
        let DestructCartLine {
            id,
            quantity,
            status,
            created_at,
            ..
        } = line.into_destruct();
        let DestructBook {
            id: book_id,
            title,
            author,
            price,
            image,
            ..
        } = book.into_destruct();
        Self {
            id,
            quantity,
            status,
            subtotal,
            created_at,
            book: CartBookResponse {
                id: book_id,
                title,
                author,
                price,
                image,
            },
        }
    }
}

impl IntoResponse for CartItemResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    message: &'static str,
    lines: usize,
    total: i64,
}

pub struct Presenter;

impl Exhaust<Vec<CartEntry>> for Presenter {
    type To = Json<Vec<CartItemResponse>>;
    fn emit(&self, input: Vec<CartEntry>) -> Self::To {
        Json(input.into_iter().map(CartItemResponse::from).collect())
    }
}

impl Exhaust<CartEntry> for Presenter {
    type To = CartItemResponse;
    fn emit(&self, input: CartEntry) -> Self::To {
        CartItemResponse::from(input)
    }
}

impl Exhaust<CartUpdate> for Presenter {
    type To = Response;
    fn emit(&self, input: CartUpdate) -> Self::To {
        match input {
            CartUpdate::Updated(entry) => CartItemResponse::from(entry).into_response(),
            CartUpdate::Removed => message(REMOVED).into_response(),
        }
    }
}

impl Exhaust<()> for Presenter {
    type To = Json<Value>;
    fn emit(&self, _: ()) -> Self::To {
        message(REMOVED)
    }
}

impl Exhaust<CheckoutReceipt> for Presenter {
    type To = Json<CheckoutResponse>;
    fn emit(&self, input: CheckoutReceipt) -> Self::To {
        Json(CheckoutResponse {
            message: "Checkout successful",
            lines: input.lines,
            total: input.total,
        })
    }
}
