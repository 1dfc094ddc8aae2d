use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::book::errors::BookIdError;
use crate::book::errors::BookTitleError;
use crate::book::errors::PriceError;
use crate::book::errors::StockError;

/// Catalog entry.
///
/// Deleted books keep their row (and id) with `deleted_at` set, so cart lines
/// referencing them stay valid. Live catalog queries skip them.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: BookId,
    pub title: BookTitle,
    pub author: String,
    pub price: Price,
    pub stock: Stock,
    pub description: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookId(pub Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a book ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, BookIdError> {
        Uuid::parse_str(s)
            .map(BookId)
            .map_err(|e| BookIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Book title, at least 3 characters after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookTitle(String);

impl BookTitle {
    const MIN_LENGTH: usize = 3;

    pub fn new(title: String) -> Result<Self, BookTitleError> {
        let title = title.trim().to_string();
        let length = title.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(BookTitleError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Price in the smallest currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(i64);

impl Price {
    pub fn new(value: i64) -> Result<Self, PriceError> {
        if value < 0 {
            return Err(PriceError::Negative(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Units on hand. Adding to a cart checks against it but never decrements it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Stock(i32);

impl Stock {
    pub fn new(value: i32) -> Result<Self, StockError> {
        if value < 0 {
            return Err(StockError::Negative(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// Command to add a book to the catalog
#[derive(Debug, Clone)]
pub struct CreateBookCommand {
    pub title: BookTitle,
    pub author: String,
    pub price: Price,
    pub stock: Stock,
    pub description: String,
    pub image_url: String,
}

/// Partial update restricted to the externally writable fields.
///
/// Only provided fields are changed.
#[derive(Debug, Clone, Default)]
pub struct UpdateBookCommand {
    pub title: Option<BookTitle>,
    pub author: Option<String>,
    pub price: Option<Price>,
    pub stock: Option<Stock>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl UpdateBookCommand {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.description.is_none()
            && self.image_url.is_none()
    }
}
