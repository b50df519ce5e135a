//! Service configuration loaded from environment variables

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::artifacts::{ArtifactPaths, DEFAULT_MODEL_PATH, DEFAULT_SCALER_PATH};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_SCALER_PATH: &str = "SLEEPQ_SCALER_PATH";
pub const ENV_MODEL_PATH: &str = "SLEEPQ_MODEL_PATH";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub artifacts: ArtifactPaths,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            artifacts: ArtifactPaths::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a port number, got {value:?}")]
    InvalidPort { name: String, value: String },

    #[error("invalid bind address {0}")]
    InvalidAddress(String),
}

impl ServiceConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup(ENV_PORT) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidPort {
                name: ENV_PORT.to_string(),
                value,
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: lookup(ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            artifacts: ArtifactPaths {
                scaler: PathBuf::from(
                    lookup(ENV_SCALER_PATH).unwrap_or_else(|| DEFAULT_SCALER_PATH.to_string()),
                ),
                model: PathBuf::from(
                    lookup(ENV_MODEL_PATH).unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string()),
                ),
            },
        })
    }

    /// Socket address to bind the HTTP server to
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }
}
