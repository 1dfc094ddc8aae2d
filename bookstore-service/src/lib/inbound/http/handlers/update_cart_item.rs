use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use crate::cart::errors::CartError;
use crate::cart::ports::CartServicePort;
use crate::domain::account::models::AuthenticatedAccount;
use crate::domain::cart::models::CartLineId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::CartLineData;
use crate::inbound::http::router::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

pub async fn update_cart_item(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCartItemRequest>, JsonRejection>,
) -> Result<ApiSuccess<CartLineData>, ApiError> {
    // A malformed id cannot name a line of this account.
    let item_id = CartLineId::from_string(&id).map_err(|_| CartError::NotFound)?;
    let Json(req) = payload?;

    state
        .cart_service
        .update_item(&account.account_id, &item_id, req.quantity)
        .await
        .map_err(ApiError::from)
        .map(|ref line| ApiSuccess::new(StatusCode::OK, line.into()))
}
