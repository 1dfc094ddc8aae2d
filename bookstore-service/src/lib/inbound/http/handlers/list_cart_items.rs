use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::AuthenticatedAccount;
use crate::domain::cart::models::CartLineView;
use crate::domain::cart::ports::CartServicePort;
use crate::inbound::http::router::AppState;

pub async fn list_cart_items(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
) -> Result<ApiSuccess<Vec<CartItemData>>, ApiError> {
    state
        .cart_service
        .list_items(&account.account_id)
        .await
        .map_err(ApiError::from)
        .map(|items| ApiSuccess::new(StatusCode::OK, items.iter().map(CartItemData::from).collect()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartItemData {
    pub id: String,
    pub book_id: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub book: CartBookData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartBookData {
    pub title: String,
    pub author: String,
    pub price: i64,
    pub image_url: String,
    pub stock: i32,
    pub available: bool,
}

impl From<&CartLineView> for CartItemData {
    fn from(view: &CartLineView) -> Self {
        Self {
            id: view.line.id.to_string(),
            book_id: view.line.book_id.to_string(),
            quantity: view.line.quantity.value(),
            created_at: view.line.created_at,
            updated_at: view.line.updated_at,
            book: CartBookData {
                title: view.book.title.clone(),
                author: view.book.author.clone(),
                price: view.book.price,
                image_url: view.book.image_url.clone(),
                stock: view.book.stock,
                available: view.book.available,
            },
        }
    }
}
