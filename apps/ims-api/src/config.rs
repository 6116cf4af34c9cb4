//! API configuration module.
//!
//! Configuration is layered with the `config` crate:
//!
//! ```text
//! defaults  ◄──  ims.toml (optional)  ◄──  IMS_* environment variables
//! ```
//!
//! | Key                    | Env var                    | Default                 |
//! |------------------------|----------------------------|-------------------------|
//! | `bind_addr`            | `IMS_BIND_ADDR`            | `0.0.0.0:8080`          |
//! | `database_path`        | `IMS_DATABASE_PATH`        | `./ims.db`              |
//! | `max_connections`      | `IMS_MAX_CONNECTIONS`      | `5`                     |
//! | `jwt_secret`           | `IMS_JWT_SECRET`           | development secret      |
//! | `allow_sell_last_unit` | `IMS_ALLOW_SELL_LAST_UNIT` | `true`                  |

use std::net::SocketAddr;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use ims_core::StockPolicy;
use ims_db::DbConfig;
use serde::{Deserialize, Serialize};

/// Secret used when none is configured. Startup logs a warning.
pub const DEV_JWT_SECRET: &str = "ims-dev-secret-change-in-production";

/// API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Socket address the HTTP server listens on
    pub bind_addr: String,

    /// SQLite database file
    pub database_path: String,

    /// Connection pool size
    pub max_connections: u32,

    /// HS256 key used to verify bearer tokens
    pub jwt_secret: String,

    /// Whether a sale may take a variation's stock to exactly zero
    pub allow_sell_last_unit: bool,
}

impl ApiConfig {
    /// Load configuration from defaults, `ims.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = defaults()?
            .add_source(File::with_name("ims").required(false))
            .add_source(Environment::with_prefix("IMS").try_parsing(true))
            .build()?;

        Self::from_settings(settings)
    }

    fn from_settings(settings: Config) -> Result<Self, ConfigError> {
        let config: ApiConfig = settings.try_deserialize()?;

        if config.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::InvalidValue("bind_addr".to_string()));
        }
        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }
        if config.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("jwt_secret".to_string()));
        }

        Ok(config)
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }

    pub fn stock_policy(&self) -> StockPolicy {
        StockPolicy {
            allow_sell_last_unit: self.allow_sell_last_unit,
        }
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    Config::builder()
        .set_default("bind_addr", "0.0.0.0:8080")?
        .set_default("database_path", "./ims.db")?
        .set_default("max_connections", 5_i64)?
        .set_default("jwt_secret", DEV_JWT_SECRET)?
        .set_default("allow_sell_last_unit", true)
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
