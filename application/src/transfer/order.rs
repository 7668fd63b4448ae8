use kernel::prelude::entity::{CartLineId, SelectLimit, SelectOffset};

pub struct GetOrderDto {
    pub id: CartLineId,
}

pub struct GetAllOrderDto {
    pub limit: SelectLimit,
    pub offset: SelectOffset,
}
