//! Server configuration loaded from the environment.

use std::fmt;
use std::str::FromStr;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_UI_ORIGINS: &str = "http://127.0.0.1:4200,http://localhost:4200";

/// Where ships are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL through Diesel.
    Postgres {
        /// Connection string.
        database_url: String,
    },
    /// Process memory; contents are lost on restart.
    Memory,
}

impl StorageBackend {
    /// Short name of the backend, safe to log.
    pub fn label(&self) -> &'static str {
        match self {
            StorageBackend::Postgres { .. } => "postgres",
            StorageBackend::Memory => "memory",
        }
    }
}

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Origins allowed by CORS.
    pub ui_origins: Vec<String>,
    /// Ship storage.
    pub storage: StorageBackend,
}

/// Invalid or missing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    /// Build the configuration from process environment variables.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("SHIPYARD_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup("SHIPYARD_PORT") {
            Some(raw) => u16::from_str(raw.trim())
                .map_err(|_| ConfigError::new(format!("SHIPYARD_PORT must be a u16 number, got {raw:?}")))?,
            None => DEFAULT_PORT,
        };
        let origins = lookup("SHIPYARD_UI_ORIGINS").unwrap_or_else(|| DEFAULT_UI_ORIGINS.to_string());
        let ui_origins = origins
            .split(',')
            .map(|value| value.trim())
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();
        let storage = match lookup("SHIPYARD_STORAGE").as_deref().map(str::trim) {
            None | Some("postgres") => StorageBackend::Postgres {
                database_url: lookup("DATABASE_URL").ok_or_else(|| {
                    ConfigError::new("DATABASE_URL must be set to a PostgreSQL connection string")
                })?,
            },
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::new(format!(
                    "SHIPYARD_STORAGE must be \"postgres\" or \"memory\", got {other:?}"
                )));
            }
        };
        Ok(Self {
            host,
            port,
            ui_origins,
            storage,
        })
    }
}
