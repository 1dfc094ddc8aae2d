use thiserror::Error;

/// Error for BookId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookTitleError {
    #[error("Title too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PriceError {
    #[error("Price must not be negative, got {0}")]
    Negative(i64),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StockError {
    #[error("Stock must not be negative, got {0}")]
    Negative(i32),
}

/// Top-level error for catalog operations
#[derive(Debug, Clone, Error)]
pub enum BookError {
    #[error("Invalid book ID: {0}")]
    InvalidBookId(#[from] BookIdError),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] BookTitleError),

    #[error("Invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    #[error("Invalid stock: {0}")]
    InvalidStock(#[from] StockError),

    #[error("Book not found: {0}")]
    NotFound(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}
