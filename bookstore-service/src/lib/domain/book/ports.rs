use async_trait::async_trait;

use crate::book::errors::BookError;
use crate::book::models::Book;
use crate::book::models::BookId;
use crate::book::models::CreateBookCommand;
use crate::book::models::UpdateBookCommand;

/// Port for catalog operations.
#[async_trait]
pub trait CatalogServicePort: Send + Sync + 'static {
    /// List books that are not soft-deleted.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_books(&self) -> Result<Vec<Book>, BookError>;

    /// Add a book to the catalog.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_book(&self, command: CreateBookCommand) -> Result<Book, BookError>;

    /// Change allow-listed fields of a live book.
    ///
    /// # Errors
    /// * `NotFound` - Book does not exist or is deleted
    /// * `DatabaseError` - Database operation failed
    async fn update_book(
        &self,
        id: &BookId,
        command: UpdateBookCommand,
    ) -> Result<Book, BookError>;

    /// Soft-delete a live book.
    ///
    /// # Errors
    /// * `NotFound` - Book does not exist or is already deleted
    /// * `DatabaseError` - Database operation failed
    async fn delete_book(&self, id: &BookId) -> Result<(), BookError>;
}

/// Persistence operations for the catalog.
#[async_trait]
pub trait BookRepository: Send + Sync + 'static {
    async fn create(&self, book: Book) -> Result<Book, BookError>;

    /// Retrieve a book unless it is soft-deleted.
    ///
    /// # Returns
    /// Optional book entity (None if absent or deleted)
    async fn find_live_by_id(&self, id: &BookId) -> Result<Option<Book>, BookError>;

    /// All live books, oldest first.
    async fn list_live(&self) -> Result<Vec<Book>, BookError>;

    /// Apply the provided fields in a single statement.
    ///
    /// # Errors
    /// * `NotFound` - Book does not exist or is deleted
    async fn update(&self, id: &BookId, command: UpdateBookCommand) -> Result<Book, BookError>;

    /// Mark a live book as deleted.
    ///
    /// # Errors
    /// * `NotFound` - Book does not exist or is already deleted
    async fn soft_delete(&self, id: &BookId) -> Result<(), BookError>;
}
