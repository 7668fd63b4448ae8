use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct SessionToken(Uuid);

impl SessionToken {
    pub fn new(token: impl Into<Uuid>) -> Self {
        Self(token.into())
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self(Uuid::new_v4())
    }
}
