use axum::Json;
use serde::Serialize;
use serde_json::Value;

use application::transfer::UserDetail;
use kernel::prelude::entity::{
    BookPrice, BookTitle, CartLine, CartLineId, CartQuantity, CartStatus, CreatedAt, DestructOrder,
    DestructUserSummary, IsAdmin, Order, User, UserId, UserName, UserSummary,
};

use crate::controller::Exhaust;
use crate::route::message;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    id: UserId,
    username: UserName,
    is_admin: IsAdmin,
    created_at: CreatedAt<User>,
    total_orders: i64,
    total_spent: i64,
}

impl From<UserSummary> for UserSummaryResponse {
    fn from(value: UserSummary) -> Self {
        let DestructUserSummary {
            id,
            name,
            is_admin,
            created_at,
            total_orders,
            total_spent,
        } = value.into_destruct();
        Self {
            id,
            username: name,
            is_admin,
            created_at,
            total_orders,
            total_spent,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    id: CartLineId,
    user_id: UserId,
    username: UserName,
    book_title: BookTitle,
    price: BookPrice,
    quantity: CartQuantity,
    total_price: i64,
    order_date: CreatedAt<CartLine>,
    status: CartStatus,
}

impl From<Order> for OrderResponse {
    fn from(value: Order) -> Self {
        let total_price = value.total_price();
        let DestructOrder {
            id,
            user_id,
            user_name,
            book_title,
            price,
            quantity,
            status,
            created_at,
        } = value.into_destruct();
        Self {
            id,
            user_id,
            username: user_name,
            book_title,
            price,
            quantity,
            total_price,
            order_date: created_at,
            status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    #[serde(flatten)]
    summary: UserSummaryResponse,
    orders: Vec<OrderResponse>,
}

pub struct Presenter;

impl Exhaust<Vec<UserSummary>> for Presenter {
    type To = Json<Vec<UserSummaryResponse>>;
    fn emit(&self, input: Vec<UserSummary>) -> Self::To {
        Json(input.into_iter().map(UserSummaryResponse::from).collect())
    }
}

impl Exhaust<Option<UserDetail>> for Presenter {
    type To = Option<Json<UserDetailResponse>>;
    fn emit(&self, input: Option<UserDetail>) -> Self::To {
        input.map(|detail| {
            Json(UserDetailResponse {
                summary: UserSummaryResponse::from(detail.summary),
                orders: detail.orders.into_iter().map(OrderResponse::from).collect(),
            })
        })
    }
}

impl Exhaust<()> for Presenter {
    type To = Json<Value>;
    fn emit(&self, _: ()) -> Self::To {
        message("User deleted successfully")
    }
}

impl Exhaust<Vec<Order>> for Presenter {
    type To = Json<Vec<OrderResponse>>;
    fn emit(&self, input: Vec<Order>) -> Self::To {
        Json(input.into_iter().map(OrderResponse::from).collect())
    }
}

impl Exhaust<Option<Order>> for Presenter {
    type To = Option<Json<OrderResponse>>;
    fn emit(&self, input: Option<Order>) -> Self::To {
        input.map(|order| Json(OrderResponse::from(order)))
    }
}
