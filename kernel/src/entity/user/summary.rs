use destructure::Destructure;
use vodca::References;

use crate::entity::{CreatedAt, IsAdmin, User, UserId, UserName};

/// A user as the admin dashboard lists them, with totals over every cart line.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct UserSummary {
    id: UserId,
    name: UserName,
    is_admin: IsAdmin,
    created_at: CreatedAt<User>,
    total_orders: i64,
    total_spent: i64,
}

impl UserSummary {
    pub fn new(
        id: UserId,
        name: UserName,
        is_admin: IsAdmin,
        created_at: CreatedAt<User>,
        total_orders: i64,
        total_spent: i64,
    ) -> Self {
        Self {
            id,
            name,
            is_admin,
            created_at,
            total_orders,
            total_spent,
        }
    }
}
