use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header;
use axum::http::header::InvalidHeaderValue;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::add_cart_item::add_cart_item;
use super::handlers::create_book::create_book;
use super::handlers::delete_book::delete_book;
use super::handlers::list_books::list_books;
use super::handlers::list_cart_items::list_cart_items;
use super::handlers::login::login;
use super::handlers::remove_cart_item::remove_cart_item;
use super::handlers::sign_up::sign_up;
use super::handlers::update_book::update_book;
use super::handlers::update_cart_item::update_cart_item;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_admin;
use crate::domain::account::service::AuthService;
use crate::domain::book::service::CatalogService;
use crate::domain::cart::service::CartService;
use crate::outbound::repositories::PostgresAccountRepository;
use crate::outbound::repositories::PostgresBookRepository;
use crate::outbound::repositories::PostgresCartRepository;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService<PostgresAccountRepository>>,
    pub catalog_service: Arc<CatalogService<PostgresBookRepository>>,
    pub cart_service: Arc<CartService<PostgresCartRepository, PostgresBookRepository>>,
}

/// CORS policy for the single frontend origin.
///
/// # Errors
/// Fails if `allowed_origin` is not a valid header value.
pub fn cors_layer(allowed_origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    let origin = HeaderValue::from_str(allowed_origin)?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::HEAD,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ]))
}

pub fn create_router(
    auth_service: Arc<AuthService<PostgresAccountRepository>>,
    catalog_service: Arc<CatalogService<PostgresBookRepository>>,
    cart_service: Arc<CartService<PostgresCartRepository, PostgresBookRepository>>,
    cors: CorsLayer,
) -> Router {
    let state = AppState {
        auth_service,
        catalog_service,
        cart_service,
    };

    let public_routes = Router::new()
        .route("/signup", post(sign_up))
        .route("/login", post(login))
        .route("/books", get(list_books));

    let cart_routes = Router::new()
        .route("/api/cart", post(add_cart_item).get(list_cart_items))
        .route("/api/cart/:id", put(update_cart_item).delete(remove_cart_item))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Layers run outermost first: token check, then role check.
    let admin_routes = Router::new()
        .route("/admin/book", post(create_book))
        .route("/admin/book/:id", put(update_book))
        .route("/admin/book/:id", delete(delete_book))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(cart_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
