use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::account::models::AuthenticatedAccount;
use crate::domain::account::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Middleware that validates bearer tokens and adds the caller's identity
/// (`AuthenticatedAccount`) to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?.to_owned();

    // Every failure kind is logged by the service and answered the same way.
    let account = state
        .auth_service
        .authenticate(&token)
        .await
        .map_err(|_| error_response(StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;

    req.extensions_mut().insert(account);

    Ok(next.run(req).await)
}

/// Middleware for the admin group. Must run after `authenticate`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, Response> {
    let caller = req
        .extensions()
        .get::<AuthenticatedAccount>()
        .map(|account| (account.account_id, account.is_admin()));

    match caller {
        Some((_, true)) => Ok(next.run(req).await),
        Some((account_id, false)) => {
            tracing::warn!(account_id = %account_id, "Admin route refused to non-admin account");
            Err(error_response(StatusCode::FORBIDDEN, "Admin role required"))
        }
        None => Err(error_response(
            StatusCode::UNAUTHORIZED,
            "Missing Authorization header",
        )),
    }
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| error_response(StatusCode::UNAUTHORIZED, "Invalid Authorization header"))?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        error_response(
            StatusCode::UNAUTHORIZED,
            "Invalid Authorization header format. Expected: Bearer <token>",
        )
    })
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
