use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::CartQuantity;

/// Whole currency units.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookPrice(i32);

impl BookPrice {
    pub fn new(price: impl Into<i32>) -> Self {
        Self(price.into())
    }

    pub fn total(&self, quantity: &CartQuantity) -> i64 {
        i64::from(self.0) * i64::from(*quantity.as_ref())
    }
}
