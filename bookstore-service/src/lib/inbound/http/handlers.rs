use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::account::errors::AccountError;
use crate::book::errors::BookError;
use crate::book::models::Book;
use crate::cart::errors::CartError;
use crate::cart::models::CartLine;

pub mod add_cart_item;
pub mod create_book;
pub mod delete_book;
pub mod list_books;
pub mod list_cart_items;
pub mod login;
pub mod remove_cart_item;
pub mod sign_up;
pub mod update_book;
pub mod update_cart_item;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Successful response: a status code and a JSON body.
#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Error response. The message is sent to the client as `{"error": message}`
/// and must not carry storage or credential details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl ApiError {
    pub fn internal() -> Self {
        ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        (status, Json(ApiErrorBody { error: message })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidEmail(_) | AccountError::Policy(_) => {
                ApiError::BadRequest(err.to_string())
            }
            AccountError::DuplicateEmail => ApiError::Conflict(err.to_string()),
            AccountError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            AccountError::Unauthorized => {
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            AccountError::InvalidAccountId(_)
            | AccountError::InvalidRole(_)
            | AccountError::Credential(_)
            | AccountError::Token(_)
            | AccountError::DatabaseError(_)
            | AccountError::Unknown(_) => {
                tracing::error!(error = %err, "Account operation failed");
                ApiError::internal()
            }
        }
    }
}

impl From<BookError> for ApiError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::InvalidBookId(_)
            | BookError::InvalidTitle(_)
            | BookError::InvalidPrice(_)
            | BookError::InvalidStock(_) => ApiError::BadRequest(err.to_string()),
            BookError::NotFound(_) => ApiError::NotFound("Book not found".to_string()),
            BookError::DatabaseError(_) => {
                tracing::error!(error = %err, "Catalog operation failed");
                ApiError::internal()
            }
        }
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::InvalidQuantity(_) | CartError::InsufficientStock { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            CartError::BookNotFound(_) => ApiError::NotFound("Book not found".to_string()),
            CartError::NotFound => ApiError::NotFound(err.to_string()),
            CartError::DatabaseError(_) | CartError::Unknown(_) => {
                tracing::error!(error = %err, "Cart operation failed");
                ApiError::internal()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// Plain acknowledgement body, e.g. for deletions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub message: String,
}

impl MessageData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookData {
    pub id: String,
    pub title: String,
    pub author: String,
    pub price: i64,
    pub stock: i32,
    pub description: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Book> for BookData {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.to_string(),
            title: book.title.as_str().to_string(),
            author: book.author.clone(),
            price: book.price.value(),
            stock: book.stock.value(),
            description: book.description.clone(),
            image_url: book.image_url.clone(),
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineData {
    pub id: String,
    pub book_id: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CartLine> for CartLineData {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.to_string(),
            book_id: line.book_id.to_string(),
            quantity: line.quantity.value(),
            created_at: line.created_at,
            updated_at: line.updated_at,
        }
    }
}
