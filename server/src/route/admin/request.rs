use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{
    DeleteUserDto, GetAllOrderDto, GetAllUserDto, GetOrderDto, GetUserDto,
};
use kernel::prelude::entity::{CartLineId, SelectLimit, SelectOffset, UserId};

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    limit: SelectLimit,
    #[serde(default)]
    offset: SelectOffset,
}

#[derive(Debug)]
pub struct UsersRequest(PageRequest);

impl UsersRequest {
    pub fn new(page: PageRequest) -> Self {
        Self(page)
    }
}

#[derive(Debug)]
pub struct OrdersRequest(PageRequest);

impl OrdersRequest {
    pub fn new(page: PageRequest) -> Self {
        Self(page)
    }
}

#[derive(Debug)]
pub struct GetUserRequest {
    id: Uuid,
}

impl GetUserRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteUserRequest {
    id: Uuid,
}

impl DeleteUserRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct GetOrderRequest {
    id: Uuid,
}

impl GetOrderRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct Transformer;

impl Intake<UsersRequest> for Transformer {
    type To = GetAllUserDto;
    fn emit(&self, UsersRequest(page): UsersRequest) -> Self::To {
        GetAllUserDto {
            limit: page.limit,
            offset: page.offset,
        }
    }
}

impl Intake<OrdersRequest> for Transformer {
    type To = GetAllOrderDto;
    fn emit(&self, OrdersRequest(page): OrdersRequest) -> Self::To {
        GetAllOrderDto {
            limit: page.limit,
            offset: page.offset,
        }
    }
}

impl Intake<GetUserRequest> for Transformer {
    type To = GetUserDto;
    fn emit(&self, input: GetUserRequest) -> Self::To {
        GetUserDto {
            id: UserId::new(input.id),
        }
    }
}

impl Intake<DeleteUserRequest> for Transformer {
    type To = DeleteUserDto;
    fn emit(&self, input: DeleteUserRequest) -> Self::To {
        DeleteUserDto {
            id: UserId::new(input.id),
        }
    }
}

impl Intake<GetOrderRequest> for Transformer {
    type To = GetOrderDto;
    fn emit(&self, input: GetOrderRequest) -> Self::To {
        GetOrderDto {
            id: CartLineId::new(input.id),
        }
    }
}
