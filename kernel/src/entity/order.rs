use destructure::Destructure;
use vodca::References;

use crate::entity::{
    BookPrice, BookTitle, CartLine, CartLineId, CartQuantity, CartStatus, CreatedAt, UserId,
    UserName,
};

/// A cart line of any status as the admin dashboard shows it.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Order {
    id: CartLineId,
    user_id: UserId,
    user_name: UserName,
    book_title: BookTitle,
    price: BookPrice,
    quantity: CartQuantity,
    status: CartStatus,
    created_at: CreatedAt<CartLine>,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CartLineId,
        user_id: UserId,
        user_name: UserName,
        book_title: BookTitle,
        price: BookPrice,
        quantity: CartQuantity,
        status: CartStatus,
        created_at: CreatedAt<CartLine>,
    ) -> Self {
        Self {
            id,
            user_id,
            user_name,
            book_title,
            price,
            quantity,
            status,
            created_at,
        }
    }

    pub fn total_price(&self) -> i64 {
        self.price.total(&self.quantity)
    }
}

#[cfg(test)]
mod test {
    use crate::entity::{
        BookPrice, BookTitle, CartLineId, CartQuantity, CartStatus, CreatedAt, Order, UserId,
        UserName,
    };

    #[test]
    fn total_is_price_times_quantity() {
        let order = Order::new(
            CartLineId::default(),
            UserId::default(),
            UserName::new("reader"),
            BookTitle::new("Deep Work"),
            BookPrice::new(349),
            CartQuantity::new(3),
            CartStatus::Completed,
            CreatedAt::now(),
        );
        assert_eq!(order.total_price(), 1047);
    }
}
