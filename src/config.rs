//! Configuration management for TaskFlow.
//!
//! Configuration can be set via environment variables:
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `TASKFLOW_STORE` - Optional. Storage backend, `memory` or `remote`.
//!   Defaults to `memory`.
//! - `TASKFLOW_BACKEND_URL` - Required for the remote backend. Base URL of
//!   the backend-as-a-service project.
//! - `TASKFLOW_BACKEND_KEY` - Required for the remote backend. API key sent
//!   with every request.

use thiserror::Error;

use crate::store::StoreKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Storage backend configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// In-process store; data is lost on restart.
    Memory,
    /// Remote backend-as-a-service.
    Remote { url: String, api_key: String },
}

impl StoreConfig {
    pub fn kind(&self) -> StoreKind {
        match self {
            StoreConfig::Memory => StoreKind::Memory,
            StoreConfig::Remote { .. } => StoreKind::Remote,
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Storage backend
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when the remote backend is
    /// selected without `TASKFLOW_BACKEND_URL` / `TASKFLOW_BACKEND_KEY`,
    /// and `ConfigError::InvalidValue` for an unparsable `PORT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let kind = std::env::var("TASKFLOW_STORE")
            .map(|value| StoreKind::from_str(&value))
            .unwrap_or_default();

        let store = match kind {
            StoreKind::Memory => StoreConfig::Memory,
            StoreKind::Remote => {
                let url = std::env::var("TASKFLOW_BACKEND_URL").map_err(|_| {
                    ConfigError::MissingEnvVar("TASKFLOW_BACKEND_URL".to_string())
                })?;
                let api_key = std::env::var("TASKFLOW_BACKEND_KEY").map_err(|_| {
                    ConfigError::MissingEnvVar("TASKFLOW_BACKEND_KEY".to_string())
                })?;
                StoreConfig::Remote { url, api_key }
            }
        };

        Ok(Self { host, port, store })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(host: String, port: u16, store: StoreConfig) -> Self {
        Self { host, port, store }
    }
}
