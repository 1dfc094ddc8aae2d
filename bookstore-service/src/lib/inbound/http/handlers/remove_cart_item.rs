use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use crate::cart::errors::CartError;
use crate::cart::ports::CartServicePort;
use crate::domain::account::models::AuthenticatedAccount;
use crate::domain::cart::models::CartLineId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::router::AppState;

pub async fn remove_cart_item(
    State(state): State<AppState>,
    Extension(account): Extension<AuthenticatedAccount>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let item_id = CartLineId::from_string(&id).map_err(|_| CartError::NotFound)?;

    state
        .cart_service
        .remove_item(&account.account_id, &item_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("Cart item removed")))
}
