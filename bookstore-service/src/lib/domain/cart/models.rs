use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::models::AccountId;
use crate::book::models::BookId;
use crate::cart::errors::CartLineIdError;
use crate::cart::errors::QuantityError;

/// One book held in one account's cart.
///
/// At most one line exists per (account, book); adding the same book again
/// grows the existing line.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub id: CartLineId,
    pub account_id: AccountId,
    pub book_id: BookId,
    pub quantity: Quantity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartLine {
    /// A fresh line, used as the insert candidate of an add.
    pub fn new(account_id: AccountId, book_id: BookId, quantity: Quantity) -> Self {
        let now = Utc::now();
        Self {
            id: CartLineId::new(),
            account_id,
            book_id,
            quantity,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CartLineId(pub Uuid);

impl CartLineId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a cart line ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, CartLineIdError> {
        Uuid::parse_str(s)
            .map(CartLineId)
            .map_err(|e| CartLineIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for CartLineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CartLineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Line quantity, always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity(i32);

impl Quantity {
    pub fn new(value: i32) -> Result<Self, QuantityError> {
        if value < 1 {
            return Err(QuantityError::NotPositive(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// Display fields of the book behind a cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct CartBookSummary {
    pub title: String,
    pub author: String,
    pub price: i64,
    pub image_url: String,
    pub stock: i32,
    /// False once the book has been removed from the catalog.
    pub available: bool,
}

/// Cart line joined with its book.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineView {
    pub line: CartLine,
    pub book: CartBookSummary,
}
