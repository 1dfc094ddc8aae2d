use thiserror::Error;

use crate::book::errors::BookError;

/// Error for CartLineId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartLineIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuantityError {
    #[error("Quantity must be at least 1, got {0}")]
    NotPositive(i32),
}

/// Top-level error for cart operations
#[derive(Debug, Clone, Error)]
pub enum CartError {
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("Not enough stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i32, available: i32 },

    /// Absent, or owned by another account. The two are never told apart.
    #[error("Cart item not found")]
    NotFound,

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<BookError> for CartError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::NotFound(id) => CartError::BookNotFound(id),
            BookError::DatabaseError(msg) => CartError::DatabaseError(msg),
            other => CartError::Unknown(other.to_string()),
        }
    }
}
