//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `HOSPITALITY_BOT`
//! prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use hospitality_bot::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod ai;
mod auth;
mod database;
mod error;
mod features;
mod redis;
mod server;
mod widget;

pub use ai::{AiConfig, AiProvider};
pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};
pub use widget::WidgetSettings;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection; in-memory repositories are used when absent
    pub database: Option<DatabaseConfig>,

    /// Redis connection for rate limiting; in-memory limiter when absent
    pub redis: Option<RedisConfig>,

    /// Dashboard token verification
    pub auth: AuthConfig,

    /// AI provider configuration (Anthropic/OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Widget embedding and public rate limits
    #[serde(default)]
    pub widget: WidgetSettings,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `HOSPITALITY_BOT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `HOSPITALITY_BOT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `HOSPITALITY_BOT__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("HOSPITALITY_BOT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        if let Some(redis) = &self.redis {
            redis.validate()?;
        }
        self.auth.validate(&self.server.environment)?;
        self.ai.validate()?;
        self.widget.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
