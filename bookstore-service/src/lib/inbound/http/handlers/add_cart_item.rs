use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::CartLineData;
use crate::book::errors::BookError;
use crate::domain::account::models::AuthenticatedAccount;
use crate::domain::book::models::BookId;
use crate::domain::cart::ports::CartServicePort;
use crate::inbound::http::router::AppState;

pub async fn add_cart_item(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
    payload: Result<Json<AddCartItemRequest>, JsonRejection>,
) -> Result<ApiSuccess<CartLineData>, ApiError> {
    let Json(body) = payload?;
    let book_id = BookId::from_string(&body.book_id).map_err(BookError::from)?;

    state
        .cart_service
        .add_item(&account.account_id, &book_id, body.quantity)
        .await
        .map_err(ApiError::from)
        .map(|ref line| ApiSuccess::new(StatusCode::CREATED, line.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddCartItemRequest {
    book_id: String,
    quantity: i32,
}
