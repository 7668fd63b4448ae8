mod admin;
mod id;
mod name;
mod password;
mod summary;

pub use self::{admin::*, id::*, name::*, password::*, summary::*};
use crate::entity::CreatedAt;
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, Destructure, References)]
pub struct User {
    id: UserId,
    name: UserName,
    password: PasswordHash,
    is_admin: IsAdmin,
    created_at: CreatedAt<User>,
}

impl User {
    pub fn new(
        id: UserId,
        name: UserName,
        password: PasswordHash,
        is_admin: IsAdmin,
        created_at: CreatedAt<User>,
    ) -> Self {
        Self {
            id,
            name,
            password,
            is_admin,
            created_at,
        }
    }
}
