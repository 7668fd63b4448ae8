mod book;
mod cart;
mod session;
mod user;

pub use self::{book::*, cart::*, session::*, user::*};
