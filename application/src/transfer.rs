mod book;
mod cart;
mod order;
mod user;

pub use self::{book::*, cart::*, order::*, user::*};
