use std::net::SocketAddr;
use std::path::PathBuf;

use crate::domain::services::artifact::DEFAULT_ARTIFACT_PATH;
use crate::persistence::DatabaseConfig;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

/// Configuration for the serving process
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub model_path: PathBuf,
    pub database: DatabaseConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            model_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            database: DatabaseConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ServiceConfig {
        let mut config = ServiceConfig::default();

        if let Ok(addr) = std::env::var("PREDIXA_BIND_ADDR") {
            match addr.parse::<SocketAddr>() {
                Ok(value) => config.bind_addr = value,
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse PREDIXA_BIND_ADDR '{}': {}, using default: {}",
                        addr,
                        e,
                        config.bind_addr
                    );
                }
            }
        }

        if let Ok(path) = std::env::var("MODEL_PATH") {
            if !path.trim().is_empty() {
                config.model_path = PathBuf::from(path);
            }
        }

        config.database = DatabaseConfig::from_env();

        config
    }
}
