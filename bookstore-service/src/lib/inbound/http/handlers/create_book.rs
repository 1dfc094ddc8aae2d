use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::BookData;
use crate::book::errors::BookTitleError;
use crate::book::errors::PriceError;
use crate::book::errors::StockError;
use crate::domain::book::models::BookTitle;
use crate::domain::book::models::CreateBookCommand;
use crate::domain::book::models::Price;
use crate::domain::book::models::Stock;
use crate::domain::book::ports::CatalogServicePort;
use crate::inbound::http::router::AppState;

pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<CreateBookRequest>, JsonRejection>,
) -> Result<ApiSuccess<BookData>, ApiError> {
    let Json(body) = payload?;

    state
        .catalog_service
        .create_book(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref book| ApiSuccess::new(StatusCode::CREATED, book.into()))
}

/// HTTP request body for adding a book (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateBookRequest {
    title: String,
    #[serde(default)]
    author: String,
    price: i64,
    #[serde(default)]
    stock: i32,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image_url: String,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateBookRequestError {
    #[error("Invalid title: {0}")]
    Title(#[from] BookTitleError),

    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),

    #[error("Invalid stock: {0}")]
    Stock(#[from] StockError),
}

impl CreateBookRequest {
    fn try_into_command(self) -> Result<CreateBookCommand, ParseCreateBookRequestError> {
        Ok(CreateBookCommand {
            title: BookTitle::new(self.title)?,
            author: self.author,
            price: Price::new(self.price)?,
            stock: Stock::new(self.stock)?,
            description: self.description,
            image_url: self.image_url,
        })
    }
}

impl From<ParseCreateBookRequestError> for ApiError {
    fn from(err: ParseCreateBookRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}
