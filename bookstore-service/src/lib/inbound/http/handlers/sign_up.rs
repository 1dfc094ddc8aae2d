use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::SignUpCommand;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<ApiSuccess<SignUpResponseData>, ApiError> {
    let Json(body) = payload?;

    state
        .auth_service
        .sign_up(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::CREATED, account.into()))
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignUpRequest {
    email: String,
    password: String,
    name: String,
}

impl SignUpRequest {
    fn try_into_command(self) -> Result<SignUpCommand, AccountError> {
        let email = EmailAddress::new(self.email)?;
        Ok(SignUpCommand::new(email, self.password, self.name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignUpResponseData {
    pub email: String,
    pub name: String,
}

impl From<&Account> for SignUpResponseData {
    fn from(account: &Account) -> Self {
        Self {
            email: account.email.as_str().to_string(),
            name: account.name.clone(),
        }
    }
}
