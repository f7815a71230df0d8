//! Configuration for the budget client.
//!
//! Configuration can be set via environment variables:
//! - `BUDGET_API_HOST` - Required. Base URL of the HTTP API server, e.g. `http://localhost:5007/v1`.
//! - `BUDGET_API_KEY` - Required. Sent as the `x-api-key` header on every request.
//! - `BUDGET_SYNC_ID` - Required. Sync id of the budget the client is bound to.
//! - `BUDGET_API_TIMEOUT_SECS` - Optional. Transport timeout in seconds. Unset means no timeout.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the API server
    pub host: String,

    /// API key for the `x-api-key` header
    pub api_key: String,

    /// Budget the client operates on
    pub budget_sync_id: String,

    /// Transport timeout applied to each request
    pub timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if a required variable is unset or empty,
    /// and `ConfigError::InvalidValue` if `BUDGET_API_TIMEOUT_SECS` is not an integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
        };

        let host = required("BUDGET_API_HOST")?;
        let api_key = required("BUDGET_API_KEY")?;
        let budget_sync_id = required("BUDGET_SYNC_ID")?;

        let timeout = match lookup("BUDGET_API_TIMEOUT_SECS") {
            Some(raw) if !raw.trim().is_empty() => {
                let secs: u64 = raw.trim().parse().map_err(|e| {
                    ConfigError::InvalidValue("BUDGET_API_TIMEOUT_SECS".to_string(), format!("{}", e))
                })?;
                Some(Duration::from_secs(secs))
            }
            _ => None,
        };

        Ok(Self {
            host,
            api_key,
            budget_sync_id,
            timeout,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(host: String, api_key: String, budget_sync_id: String) -> Self {
        Self {
            host,
            api_key,
            budget_sync_id,
            timeout: None,
        }
    }
}
