mod book;
mod cart;
mod common;
mod order;
mod session;
mod user;

pub use self::{book::*, cart::*, common::*, order::*, session::*, user::*};
