use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct CartLineId(Uuid);

impl CartLineId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}

impl Default for CartLineId {
    fn default() -> Self {
        Self(Uuid::new_v4())
    }
}
