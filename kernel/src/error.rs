use std::fmt::Display;

use error_stack::Context;

use crate::entity::BookTitle;

#[derive(Debug)]
pub enum KernelError {
    Concurrency,
    Timeout,
    Unavailable,
    Internal,
    NotFound(&'static str),
    Validation(String),
    Conflict(&'static str),
    Unauthorized,
    InvalidToken,
    InvalidCredentials,
    Forbidden,
    EmptyCart,
    InsufficientStock(BookTitle),
}

impl KernelError {
    /// Store failures the caller may retry as-is.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            KernelError::Concurrency | KernelError::Timeout | KernelError::Unavailable
        )
    }
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Unavailable => write!(f, "Database unavailable, try again later"),
            KernelError::Internal => write!(f, "Internal kernel error"),
            KernelError::NotFound(entity) => write!(f, "{} not found", entity),
            KernelError::Validation(reason) => write!(f, "{}", reason),
            KernelError::Conflict(reason) => write!(f, "{}", reason),
            KernelError::Unauthorized => write!(f, "Authentication token required"),
            KernelError::InvalidToken => write!(f, "Invalid token"),
            KernelError::InvalidCredentials => write!(f, "Invalid username or password"),
            KernelError::Forbidden => {
                write!(f, "Access denied. Admin authentication required.")
            }
            KernelError::EmptyCart => write!(f, "Cart is empty"),
            KernelError::InsufficientStock(title) => {
                write!(f, "Not enough stock for {}", title.as_ref())
            }
        }
    }
}

impl Context for KernelError {}
