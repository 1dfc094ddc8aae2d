use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::book::errors::BookError;
use crate::domain::book::models::Book;
use crate::domain::book::models::BookId;
use crate::domain::book::models::BookTitle;
use crate::domain::book::models::Price;
use crate::domain::book::models::Stock;
use crate::domain::book::models::UpdateBookCommand;
use crate::domain::book::ports::BookRepository;

pub struct PostgresBookRepository {
    pool: PgPool,
}

impl PostgresBookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: Uuid,
    title: String,
    author: String,
    price: i64,
    stock: i32,
    description: String,
    image_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookRow> for Book {
    type Error = BookError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        Ok(Book {
            id: BookId(row.id),
            title: BookTitle::new(row.title)?,
            author: row.author,
            price: Price::new(row.price)?,
            stock: Stock::new(row.stock)?,
            description: row.description,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl BookRepository for PostgresBookRepository {
    async fn create(&self, book: Book) -> Result<Book, BookError> {
        sqlx::query(
            r#"
            INSERT INTO books (id, title, author, price, stock, description, image_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(book.id.0)
        .bind(book.title.as_str())
        .bind(&book.author)
        .bind(book.price.value())
        .bind(book.stock.value())
        .bind(&book.description)
        .bind(&book.image_url)
        .bind(book.created_at)
        .bind(book.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| BookError::DatabaseError(e.to_string()))?;

        Ok(book)
    }

    async fn find_live_by_id(&self, id: &BookId) -> Result<Option<Book>, BookError> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT id, title, author, price, stock, description, image_url, created_at, updated_at
            FROM books
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| BookError::DatabaseError(e.to_string()))?;

        row.map(Book::try_from).transpose()
    }

    async fn list_live(&self) -> Result<Vec<Book>, BookError> {
        let rows = sqlx::query_as::<_, BookRow>(
            r#"
            SELECT id, title, author, price, stock, description, image_url, created_at, updated_at
            FROM books
            WHERE deleted_at IS NULL
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| BookError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Book::try_from).collect()
    }

    async fn update(&self, id: &BookId, command: UpdateBookCommand) -> Result<Book, BookError> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            UPDATE books
            SET title = COALESCE($2, title),
                author = COALESCE($3, author),
                price = COALESCE($4, price),
                stock = COALESCE($5, stock),
                description = COALESCE($6, description),
                image_url = COALESCE($7, image_url),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, title, author, price, stock, description, image_url, created_at, updated_at
            "#,
        )
        .bind(id.0)
        .bind(command.title.as_ref().map(|t| t.as_str().to_string()))
        .bind(command.author)
        .bind(command.price.map(|p| p.value()))
        .bind(command.stock.map(|s| s.value()))
        .bind(command.description)
        .bind(command.image_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| BookError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => Book::try_from(row),
            None => Err(BookError::NotFound(id.to_string())),
        }
    }

    async fn soft_delete(&self, id: &BookId) -> Result<(), BookError> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| BookError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(BookError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
