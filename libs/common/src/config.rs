//! Client configuration
//!
//! Settings are read from the environment through the `config` crate, with
//! defaults that match a local development backend.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment};
use serde::Deserialize;
use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Default backend location
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Default request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: i64 = 10;

/// Configuration shared by every client crate
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "http://localhost:8080")
    pub backend_url: Url,
    /// Timeout applied to every outbound request
    pub request_timeout_secs: u64,
    /// Storage file; in-memory storage is used when absent
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a new ClientConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BACKEND_URL`: Backend base URL (default: "http://localhost:8080")
    /// - `REQUEST_TIMEOUT_SECS`: Request timeout in seconds (default: 10)
    /// - `STORAGE_PATH`: Path of the JSON storage file (default: in-memory)
    pub fn from_env() -> ConfigResult<Self> {
        let settings = Config::builder()
            .set_default("backend_url", DEFAULT_BACKEND_URL)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?
            .add_source(Environment::default().try_parsing(true))
            .build()?;

        let config: ClientConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration pointing at the given backend
    pub fn new(backend_url: Url) -> Self {
        Self {
            backend_url,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS as u64,
            storage_path: None,
        }
    }

    /// Request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.backend_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                key: "backend_url",
                reason: format!("{} cannot be used as a base URL", self.backend_url),
            });
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "request_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
