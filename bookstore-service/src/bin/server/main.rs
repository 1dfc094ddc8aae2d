use std::sync::Arc;

use auth::CredentialHasher;
use auth::SessionTokenCodec;
use bookstore_service::config::Config;
use bookstore_service::domain::account::models::SignUpPolicy;
use bookstore_service::domain::account::service::AuthService;
use bookstore_service::domain::book::service::CatalogService;
use bookstore_service::domain::cart::service::CartService;
use bookstore_service::inbound::http::router::cors_layer;
use bookstore_service::inbound::http::router::create_router;
use bookstore_service::outbound::repositories::PostgresAccountRepository;
use bookstore_service::outbound::repositories::PostgresBookRepository;
use bookstore_service::outbound::repositories::PostgresCartRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookstore_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "bookstore-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        max_connections = config.database.max_connections,
        jwt_expiration_hours = config.jwt.expiration_hours,
        password_cost = config.password.cost,
        cors_allowed_origin = %config.cors.allowed_origin,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let hasher = CredentialHasher::with_cost(config.password.cost)?;
    let token_codec = Arc::new(
        SessionTokenCodec::new(config.jwt.secret.as_bytes())
            .with_ttl_hours(config.jwt.expiration_hours),
    );
    let policy = SignUpPolicy {
        min_password_length: config.accounts.min_password_length,
        min_name_length: config.accounts.min_name_length,
    };

    let account_repository = Arc::new(PostgresAccountRepository::new(pg_pool.clone()));
    let book_repository = Arc::new(PostgresBookRepository::new(pg_pool.clone()));
    let cart_repository = Arc::new(PostgresCartRepository::new(pg_pool));

    let auth_service = Arc::new(AuthService::new(
        account_repository,
        hasher,
        token_codec,
        policy,
    ));
    let catalog_service = Arc::new(CatalogService::new(Arc::clone(&book_repository)));
    let cart_service = Arc::new(CartService::new(cart_repository, book_repository));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        auth_service,
        catalog_service,
        cart_service,
        cors_layer(&config.cors.allowed_origin)?,
    );

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}
