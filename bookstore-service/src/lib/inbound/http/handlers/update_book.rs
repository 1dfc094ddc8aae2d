use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::book::errors::BookError;
use crate::book::ports::CatalogServicePort;
use crate::domain::book::models::BookId;
use crate::domain::book::models::BookTitle;
use crate::domain::book::models::Price;
use crate::domain::book::models::Stock;
use crate::domain::book::models::UpdateBookCommand;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::BookData;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating a book (raw JSON).
///
/// Only these fields are writable; any other key rejects the request.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub price: Option<i64>,
    pub stock: Option<i32>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl UpdateBookRequest {
    fn try_into_command(self) -> Result<UpdateBookCommand, BookError> {
        Ok(UpdateBookCommand {
            title: self.title.map(BookTitle::new).transpose()?,
            author: self.author,
            price: self.price.map(Price::new).transpose()?,
            stock: self.stock.map(Stock::new).transpose()?,
            description: self.description,
            image_url: self.image_url,
        })
    }
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateBookRequest>, JsonRejection>,
) -> Result<ApiSuccess<BookData>, ApiError> {
    let book_id = BookId::from_string(&id).map_err(BookError::from)?;
    let Json(req) = payload?;
    let command = req.try_into_command()?;

    state
        .catalog_service
        .update_book(&book_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref book| ApiSuccess::new(StatusCode::OK, book.into()))
}
