use crate::{env_parse_or, ConfigError, FromEnv};
use std::time::Duration;

/// Request handling policy shared by every HTTP route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpConfig {
    /// Per-request deadline in milliseconds
    pub request_timeout_ms: u64,
    /// Requests allowed per client within one window
    pub rate_limit_requests: u32,
    /// Rate limit window length in seconds
    pub rate_limit_window_secs: u64,
    /// Page size used when a list request omits `limit`
    pub default_page_limit: u64,
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 5_000,
            rate_limit_requests: 10,
            rate_limit_window_secs: 60,
            default_page_limit: 25,
        }
    }
}

impl FromEnv for HttpConfig {
    /// Reads from environment variables with defaults:
    /// - REQUEST_TIMEOUT_MS: 5000
    /// - RATE_LIMIT_REQUESTS: 10
    /// - RATE_LIMIT_WINDOW_SECS: 60
    /// - PAGINATION_DEFAULT_LIMIT: 25 (must be within 1..=100)
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            request_timeout_ms: env_parse_or("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms)?,
            rate_limit_requests: env_parse_or("RATE_LIMIT_REQUESTS", defaults.rate_limit_requests)?,
            rate_limit_window_secs: env_parse_or(
                "RATE_LIMIT_WINDOW_SECS",
                defaults.rate_limit_window_secs,
            )?,
            default_page_limit: env_parse_or(
                "PAGINATION_DEFAULT_LIMIT",
                defaults.default_page_limit,
            )?,
        };

        if config.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "REQUEST_TIMEOUT_MS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }
        if config.rate_limit_requests == 0 {
            return Err(ConfigError::InvalidValue {
                key: "RATE_LIMIT_REQUESTS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }
        if config.rate_limit_window_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "RATE_LIMIT_WINDOW_SECS".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }
        if !(1..=100).contains(&config.default_page_limit) {
            return Err(ConfigError::InvalidValue {
                key: "PAGINATION_DEFAULT_LIMIT".to_string(),
                details: "must be between 1 and 100".to_string(),
            });
        }

        Ok(config)
    }
}
