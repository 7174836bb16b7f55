//! Ride provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::{is_http_url, MAX_RETRIES};
use crate::adapters::ride::DEFAULT_UBER_BASE_URL;
use crate::adapters::RetryPolicy;

/// Ride provider configuration (Uber REST API)
#[derive(Debug, Clone, Deserialize)]
pub struct RideProviderConfig {
    /// Application server token, used to list products
    pub server_token: Secret<String>,

    /// API root; sandbox unless overridden
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Locale sent as `Accept-Language`
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries for product listing
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

impl RideProviderConfig {
    pub fn new(server_token: impl Into<String>) -> Self {
        Self {
            server_token: Secret::new(server_token.into()),
            base_url: default_base_url(),
            locale: default_locale(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            retry_backoff_ms: default_retry_backoff(),
        }
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_backoff_ms))
    }

    /// Check whether calls go to the sandbox
    pub fn is_sandbox(&self) -> bool {
        self.base_url.contains("sandbox")
    }

    /// Validate ride provider configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.server_token.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("RIDE_PROVIDER__SERVER_TOKEN"));
        }
        if !is_http_url(&self.base_url) {
            return Err(ValidationError::InvalidUrl("ride_provider"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout("ride_provider"));
        }
        if self.max_retries > MAX_RETRIES {
            return Err(ValidationError::TooManyRetries("ride_provider"));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    DEFAULT_UBER_BASE_URL.to_string()
}

fn default_locale() -> String {
    "en_US".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_retries() -> u32 {
    2
}

fn default_retry_backoff() -> u64 {
    250
}
