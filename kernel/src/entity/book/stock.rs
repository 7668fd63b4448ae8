use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::CartQuantity;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookStock(i32);

impl BookStock {
    pub fn new(stock: impl Into<i32>) -> Self {
        Self(stock.into())
    }

    pub fn covers(&self, quantity: &CartQuantity) -> bool {
        self.0 >= *quantity.as_ref()
    }

    /// `None` when the result would go below zero.
    pub fn minus(&self, quantity: &CartQuantity) -> Option<Self> {
        self.0
            .checked_sub(*quantity.as_ref())
            .filter(|remaining| *remaining >= 0)
            .map(Self)
    }
}

#[cfg(test)]
mod test {
    use crate::entity::{BookStock, CartQuantity};

    #[test]
    fn minus_never_goes_negative() {
        assert_eq!(
            BookStock::new(3).minus(&CartQuantity::new(3)),
            Some(BookStock::new(0))
        );
        assert_eq!(BookStock::new(3).minus(&CartQuantity::new(4)), None);
        assert!(BookStock::new(3).covers(&CartQuantity::new(2)));
    }
}
