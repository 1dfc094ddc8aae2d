use std::env;

use config::builder::ConfigBuilder;
use config::builder::DefaultState;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    pub accounts: AccountsConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

/// Work factor of the credential hasher.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub cost: u32,
}

/// Signup minimums, counted in characters.
#[derive(Debug, Deserialize, Clone)]
pub struct AccountsConfig {
    pub min_password_length: usize,
    pub min_name_length: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origin: String,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    ///
    /// # Errors
    /// Fails when a source cannot be read, a value has the wrong type, or
    /// `jwt.secret` is missing or empty.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"));

        Self::from_builder(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("database.max_connections", 5_i64)?
            .set_default("server.http_port", 3000_i64)?
            .set_default("jwt.expiration_hours", 72_i64)?
            .set_default("password.cost", 14_i64)?
            .set_default("accounts.min_password_length", 8_i64)?
            .set_default("accounts.min_name_length", 4_i64)?
            .set_default("cors.allowed_origin", "http://localhost:5173")
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Config = builder.build()?.try_deserialize()?;

        if config.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must be set to a non-empty value".to_string(),
            ));
        }

        if config.jwt.expiration_hours <= 0 {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be positive, got {}",
                config.jwt.expiration_hours
            )));
        }

        Ok(config)
    }
}
