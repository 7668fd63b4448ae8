use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::KernelError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct CartQuantity(i32);

impl CartQuantity {
    pub fn new(quantity: impl Into<i32>) -> Self {
        Self(quantity.into())
    }

    /// Rejects anything below one.
    pub fn positive(quantity: i32) -> error_stack::Result<Self, KernelError> {
        if quantity < 1 {
            return Err(error_stack::Report::new(KernelError::Validation(
                "Quantity must be at least 1".to_string(),
            )));
        }
        Ok(Self(quantity))
    }

    pub fn merge(&self, other: &CartQuantity) -> error_stack::Result<Self, KernelError> {
        self.0.checked_add(other.0).map(Self).ok_or_else(|| {
            error_stack::Report::new(KernelError::Validation("Quantity too large".to_string()))
        })
    }
}

#[cfg(test)]
mod test {
    use crate::entity::CartQuantity;

    #[test]
    fn positive_only() {
        assert!(CartQuantity::positive(0).is_err());
        assert!(CartQuantity::positive(-3).is_err());
        assert_eq!(CartQuantity::positive(2).unwrap(), CartQuantity::new(2));
    }

    #[test]
    fn merge_sums() {
        let merged = CartQuantity::new(2).merge(&CartQuantity::new(3)).unwrap();
        assert_eq!(merged, CartQuantity::new(5));
        assert!(CartQuantity::new(i32::MAX)
            .merge(&CartQuantity::new(1))
            .is_err());
    }
}
