use kernel::prelude::entity::{Order, SelectLimit, SelectOffset, SessionToken, UserId, UserSummary};

pub struct RegisterDto {
    pub name: String,
    pub password: String,
}

#[derive(Debug)]
pub struct LoginDto {
    pub name: String,
    pub password: String,
}

pub struct AuthenticateDto {
    pub token: SessionToken,
}

pub struct LogoutDto {
    pub token: SessionToken,
}

pub struct GetAllUserDto {
    pub limit: SelectLimit,
    pub offset: SelectOffset,
}

pub struct GetUserDto {
    pub id: UserId,
}

pub struct DeleteUserDto {
    pub id: UserId,
}

#[derive(Debug, Clone)]
pub struct UserDetail {
    pub summary: UserSummary,
    pub orders: Vec<Order>,
}
