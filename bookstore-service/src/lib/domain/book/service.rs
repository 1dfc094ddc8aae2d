use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::book::errors::BookError;
use crate::book::models::Book;
use crate::book::models::BookId;
use crate::book::models::CreateBookCommand;
use crate::book::models::UpdateBookCommand;
use crate::book::ports::BookRepository;
use crate::book::ports::CatalogServicePort;

/// Catalog CRUD over a book repository.
pub struct CatalogService<BR>
where
    BR: BookRepository,
{
    repository: Arc<BR>,
}

impl<BR> CatalogService<BR>
where
    BR: BookRepository,
{
    pub fn new(repository: Arc<BR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<BR> CatalogServicePort for CatalogService<BR>
where
    BR: BookRepository,
{
    async fn list_books(&self) -> Result<Vec<Book>, BookError> {
        self.repository.list_live().await
    }

    async fn create_book(&self, command: CreateBookCommand) -> Result<Book, BookError> {
        let now = Utc::now();
        let book = Book {
            id: BookId::new(),
            title: command.title,
            author: command.author,
            price: command.price,
            stock: command.stock,
            description: command.description,
            image_url: command.image_url,
            created_at: now,
            updated_at: now,
        };

        let book = self.repository.create(book).await?;
        tracing::info!(book_id = %book.id, stock = book.stock.value(), "Book created");

        Ok(book)
    }

    async fn update_book(
        &self,
        id: &BookId,
        command: UpdateBookCommand,
    ) -> Result<Book, BookError> {
        if command.is_empty() {
            return self
                .repository
                .find_live_by_id(id)
                .await?
                .ok_or(BookError::NotFound(id.to_string()));
        }

        let book = self.repository.update(id, command).await?;
        tracing::info!(book_id = %book.id, "Book updated");

        Ok(book)
    }

    async fn delete_book(&self, id: &BookId) -> Result<(), BookError> {
        self.repository.soft_delete(id).await?;
        tracing::info!(book_id = %id, "Book deleted");

        Ok(())
    }
}
