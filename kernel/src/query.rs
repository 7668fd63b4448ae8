mod book;
mod cart;
mod order;
mod session;
mod user;

pub use self::{book::*, cart::*, order::*, session::*, user::*};
