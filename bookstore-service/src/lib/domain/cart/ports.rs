use async_trait::async_trait;

use crate::account::models::AccountId;
use crate::book::models::BookId;
use crate::cart::errors::CartError;
use crate::cart::models::CartLine;
use crate::cart::models::CartLineId;
use crate::cart::models::CartLineView;
use crate::cart::models::Quantity;

/// Port for cart operations on behalf of an already authenticated account.
#[async_trait]
pub trait CartServicePort: Send + Sync + 'static {
    /// Add `quantity` units of a book, merging into an existing line.
    ///
    /// # Returns
    /// The created or grown cart line
    ///
    /// # Errors
    /// * `InvalidQuantity` - Quantity below 1
    /// * `BookNotFound` - Book does not exist or is deleted
    /// * `InsufficientStock` - Stock below the requested quantity or the resulting line total
    /// * `DatabaseError` - Database operation failed
    async fn add_item(
        &self,
        account_id: &AccountId,
        book_id: &BookId,
        quantity: i32,
    ) -> Result<CartLine, CartError>;

    /// List the account's cart lines with book details, oldest first.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_items(&self, account_id: &AccountId) -> Result<Vec<CartLineView>, CartError>;

    /// Set the quantity of a line owned by the account.
    ///
    /// # Errors
    /// * `InvalidQuantity` - Quantity below 1
    /// * `NotFound` - No such line for this account
    /// * `DatabaseError` - Database operation failed
    async fn update_item(
        &self,
        account_id: &AccountId,
        item_id: &CartLineId,
        quantity: i32,
    ) -> Result<CartLine, CartError>;

    /// Remove a line owned by the account.
    ///
    /// # Errors
    /// * `NotFound` - No such line for this account
    /// * `DatabaseError` - Database operation failed
    async fn remove_item(
        &self,
        account_id: &AccountId,
        item_id: &CartLineId,
    ) -> Result<(), CartError>;
}

/// Persistence operations for cart lines.
///
/// Every method is a single statement; ownership is part of each predicate.
#[async_trait]
pub trait CartRepository: Send + Sync + 'static {
    /// Insert `line`, or add its quantity to the existing line for the same
    /// (account, book), provided the resulting quantity does not exceed the
    /// book's stock.
    ///
    /// # Returns
    /// The stored line, or None when the stock check failed (nothing changed)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn add_or_increment(&self, line: CartLine) -> Result<Option<CartLine>, CartError>;

    async fn list_for_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<CartLineView>, CartError>;

    /// # Errors
    /// * `NotFound` - No line with this id for this account
    async fn set_quantity(
        &self,
        account_id: &AccountId,
        id: &CartLineId,
        quantity: Quantity,
    ) -> Result<CartLine, CartError>;

    /// # Errors
    /// * `NotFound` - No line with this id for this account
    async fn delete(&self, account_id: &AccountId, id: &CartLineId) -> Result<(), CartError>;
}
