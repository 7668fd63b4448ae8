use kernel::prelude::entity::{BookId, SelectLimit, SelectOffset};

pub struct GetBookDto {
    pub id: BookId,
}

pub struct GetAllBookDto {
    pub limit: SelectLimit,
    pub offset: SelectOffset,
}

pub struct CreateBookDto {
    pub title: String,
    pub author: String,
    pub price: i32,
    pub stock: i32,
    pub image: String,
}

pub struct DeleteBookDto {
    pub id: BookId,
}

pub struct UpdateStockDto {
    pub id: BookId,
    pub stock: i32,
}

pub struct TakeBookDto {
    pub id: BookId,
}
