use vodca::{AsRefln, Fromln};

/// Encoded password hash. Never serialized.
#[derive(Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}
