use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::account::models::AccountId;
use crate::book::models::BookId;
use crate::cart::errors::CartError;
use crate::domain::cart::models::CartBookSummary;
use crate::domain::cart::models::CartLine;
use crate::domain::cart::models::CartLineId;
use crate::domain::cart::models::CartLineView;
use crate::domain::cart::models::Quantity;
use crate::domain::cart::ports::CartRepository;

pub struct PostgresCartRepository {
    pool: PgPool,
}

impl PostgresCartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CartLineRow {
    id: Uuid,
    account_id: Uuid,
    book_id: Uuid,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CartLineRow> for CartLine {
    type Error = CartError;

    fn try_from(row: CartLineRow) -> Result<Self, Self::Error> {
        Ok(CartLine {
            id: CartLineId(row.id),
            account_id: AccountId(row.account_id),
            book_id: BookId(row.book_id),
            quantity: Quantity::new(row.quantity)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CartLineViewRow {
    id: Uuid,
    account_id: Uuid,
    book_id: Uuid,
    quantity: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    title: String,
    author: String,
    price: i64,
    image_url: String,
    stock: i32,
    available: bool,
}

impl TryFrom<CartLineViewRow> for CartLineView {
    type Error = CartError;

    fn try_from(row: CartLineViewRow) -> Result<Self, Self::Error> {
        Ok(CartLineView {
            line: CartLine {
                id: CartLineId(row.id),
                account_id: AccountId(row.account_id),
                book_id: BookId(row.book_id),
                quantity: Quantity::new(row.quantity)?,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            book: CartBookSummary {
                title: row.title,
                author: row.author,
                price: row.price,
                image_url: row.image_url,
                stock: row.stock,
                available: row.available,
            },
        })
    }
}

#[async_trait]
impl CartRepository for PostgresCartRepository {
    async fn add_or_increment(&self, line: CartLine) -> Result<Option<CartLine>, CartError> {
        // The insert selects from books so a missing, deleted or understocked
        // book produces no row. On conflict the merged total is checked against
        // the same stock before updating. Either failure returns no row. The
        // check sums in BIGINT so large totals are rejected instead of overflowing.
        let row = sqlx::query_as::<_, CartLineRow>(
            r#"
            INSERT INTO cart_lines (id, account_id, book_id, quantity, created_at, updated_at)
            SELECT $1, $2, b.id, $4, $5, $5
            FROM books b
            WHERE b.id = $3 AND b.deleted_at IS NULL AND b.stock >= $4
            ON CONFLICT (account_id, book_id) DO UPDATE
            SET quantity = cart_lines.quantity + EXCLUDED.quantity,
                updated_at = EXCLUDED.updated_at
            WHERE cart_lines.quantity::bigint + EXCLUDED.quantity <= (
                SELECT stock FROM books WHERE id = $3 AND deleted_at IS NULL
            )
            RETURNING id, account_id, book_id, quantity, created_at, updated_at
            "#,
        )
        .bind(line.id.0)
        .bind(line.account_id.0)
        .bind(line.book_id.0)
        .bind(line.quantity.value())
        .bind(line.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CartError::DatabaseError(e.to_string()))?;

        row.map(CartLine::try_from).transpose()
    }

    async fn list_for_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<CartLineView>, CartError> {
        let rows = sqlx::query_as::<_, CartLineViewRow>(
            r#"
            SELECT c.id, c.account_id, c.book_id, c.quantity, c.created_at, c.updated_at,
                   b.title, b.author, b.price, b.image_url, b.stock,
                   (b.deleted_at IS NULL) AS available
            FROM cart_lines c
            JOIN books b ON b.id = c.book_id
            WHERE c.account_id = $1
            ORDER BY c.created_at, c.id
            "#,
        )
        .bind(account_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CartError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(CartLineView::try_from).collect()
    }

    async fn set_quantity(
        &self,
        account_id: &AccountId,
        id: &CartLineId,
        quantity: Quantity,
    ) -> Result<CartLine, CartError> {
        let row = sqlx::query_as::<_, CartLineRow>(
            r#"
            UPDATE cart_lines
            SET quantity = $3, updated_at = NOW()
            WHERE id = $1 AND account_id = $2
            RETURNING id, account_id, book_id, quantity, created_at, updated_at
            "#,
        )
        .bind(id.0)
        .bind(account_id.0)
        .bind(quantity.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CartError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => CartLine::try_from(row),
            None => Err(CartError::NotFound),
        }
    }

    async fn delete(&self, account_id: &AccountId, id: &CartLineId) -> Result<(), CartError> {
        let result = sqlx::query(
            r#"
            DELETE FROM cart_lines
            WHERE id = $1 AND account_id = $2
            "#,
        )
        .bind(id.0)
        .bind(account_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| CartError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(CartError::NotFound);
        }

        Ok(())
    }
}
