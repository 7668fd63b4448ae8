use kernel::prelude::entity::{BookId, CartEntry, CartLineId, UserId};

pub struct GetCartDto {
    pub user_id: UserId,
}

pub struct AddToCartDto {
    pub user_id: UserId,
    pub book_id: BookId,
    pub quantity: i32,
}

pub struct UpdateCartLineDto {
    pub user_id: UserId,
    pub id: CartLineId,
    /// Zero or below removes the line.
    pub quantity: i32,
}

pub struct RemoveCartLineDto {
    pub user_id: UserId,
    pub id: CartLineId,
}

pub struct CheckoutDto {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CartUpdate {
    Updated(CartEntry),
    Removed,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct CheckoutReceipt {
    pub lines: usize,
    pub total: i64,
}
