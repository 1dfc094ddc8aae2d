use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use crate::book::errors::BookError;
use crate::book::ports::CatalogServicePort;
use crate::domain::book::models::BookId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::MessageData;
use crate::inbound::http::router::AppState;

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let book_id = BookId::from_string(&id).map_err(BookError::from)?;

    state
        .catalog_service
        .delete_book(&book_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, MessageData::new("Book deleted")))
}
