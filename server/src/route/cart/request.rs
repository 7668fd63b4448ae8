use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{
    AddToCartDto, CheckoutDto, GetCartDto, RemoveCartLineDto, UpdateCartLineDto,
};
use kernel::prelude::entity::{BookId, CartLineId, UserId};

use crate::controller::Intake;

fn one() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRequest {
    book_id: Uuid,
    #[serde(default = "one")]
    quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    quantity: i32,
}

#[derive(Debug)]
pub struct RemoveRequest {
    user_id: UserId,
    id: Uuid,
}

impl RemoveRequest {
    pub fn new(user_id: UserId, id: Uuid) -> Self {
        Self { user_id, id }
    }
}

#[derive(Debug)]
pub struct CheckoutRequest {
    user_id: UserId,
}

impl CheckoutRequest {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

pub struct Transformer;

impl Intake<UserId> for Transformer {
    type To = GetCartDto;
    fn emit(&self, input: UserId) -> Self::To {
        GetCartDto { user_id: input }
    }
}

impl Intake<(UserId, AddRequest)> for Transformer {
    type To = AddToCartDto;
    fn emit(&self, (user_id, input): (UserId, AddRequest)) -> Self::To {
        AddToCartDto {
            user_id,
            book_id: BookId::new(input.book_id),
            quantity: input.quantity,
        }
    }
}

impl Intake<(UserId, Uuid, UpdateRequest)> for Transformer {
    type To = UpdateCartLineDto;
    fn emit(&self, (user_id, id, input): (UserId, Uuid, UpdateRequest)) -> Self::To {
        UpdateCartLineDto {
            user_id,
            id: CartLineId::new(id),
            quantity: input.quantity,
        }
    }
}

impl Intake<RemoveRequest> for Transformer {
    type To = RemoveCartLineDto;
    fn emit(&self, input: RemoveRequest) -> Self::To {
        RemoveCartLineDto {
            user_id: input.user_id,
            id: CartLineId::new(input.id),
        }
    }
}

impl Intake<CheckoutRequest> for Transformer {
    type To = CheckoutDto;
    fn emit(&self, input: CheckoutRequest) -> Self::To {
        CheckoutDto {
            user_id: input.user_id,
        }
    }
}
