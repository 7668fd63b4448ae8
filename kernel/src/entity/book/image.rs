use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Path of the cover image, served elsewhere.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BookImage(String);

impl BookImage {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }
}
