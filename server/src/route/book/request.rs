use serde::Deserialize;
use uuid::Uuid;

use application::transfer::{
    CreateBookDto, DeleteBookDto, GetAllBookDto, GetBookDto, TakeBookDto, UpdateStockDto,
};
use kernel::prelude::entity::{BookId, SelectLimit, SelectOffset};

use crate::controller::Intake;

// serde's default attribute does not take literals, hence the wrapper types with Default impls.
#[derive(Debug, Deserialize)]
pub struct GetAllRequest {
    #[serde(default)]
    limit: SelectLimit,
    #[serde(default)]
    offset: SelectOffset,
}

#[derive(Debug)]
pub struct GetRequest {
    id: Uuid,
}

impl GetRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    title: String,
    author: String,
    price: i32,
    stock: i32,
    #[serde(default)]
    image: String,
}

#[derive(Debug)]
pub struct DeleteRequest {
    id: Uuid,
}

impl DeleteRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug, Deserialize)]
pub struct StockRequest {
    stock: i32,
}

#[derive(Debug)]
pub struct TakeRequest {
    id: Uuid,
}

impl TakeRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

pub struct Transformer;

impl Intake<GetAllRequest> for Transformer {
    type To = GetAllBookDto;
    fn emit(&self, input: GetAllRequest) -> Self::To {
        GetAllBookDto {
            limit: input.limit,
            offset: input.offset,
        }
    }
}

impl Intake<GetRequest> for Transformer {
    type To = GetBookDto;
    fn emit(&self, input: GetRequest) -> Self::To {
        GetBookDto {
            id: BookId::new(input.id),
        }
    }
}

impl Intake<CreateRequest> for Transformer {
    type To = CreateBookDto;
    fn emit(&self, input: CreateRequest) -> Self::To {
        CreateBookDto {
            title: input.title,
            author: input.author,
            price: input.price,
            stock: input.stock,
            image: input.image,
        }
    }
}

impl Intake<DeleteRequest> for Transformer {
    type To = DeleteBookDto;
    fn emit(&self, input: DeleteRequest) -> Self::To {
        DeleteBookDto {
            id: BookId::new(input.id),
        }
    }
}

impl Intake<(Uuid, StockRequest)> for Transformer {
    type To = UpdateStockDto;
    fn emit(&self, (id, input): (Uuid, StockRequest)) -> Self::To {
        UpdateStockDto {
            id: BookId::new(id),
            stock: input.stock,
        }
    }
}

impl Intake<TakeRequest> for Transformer {
    type To = TakeBookDto;
    fn emit(&self, input: TakeRequest) -> Self::To {
        TakeBookDto {
            id: BookId::new(input.id),
        }
    }
}
