//! Geocoding service configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::{is_http_url, MAX_RETRIES};
use crate::adapters::geocoding::DEFAULT_GEOCODING_URL;
use crate::adapters::RetryPolicy;

/// Geocoding configuration (Google Geocoding API)
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingConfig {
    /// Geocoding JSON endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key, sent as the `key` query parameter when present
    pub api_key: Option<Secret<String>>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries on transient failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

impl GeocodingConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.retry_backoff_ms))
    }

    /// Validate geocoding configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.base_url) {
            return Err(ValidationError::InvalidUrl("geocoding"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout("geocoding"));
        }
        if self.max_retries > MAX_RETRIES {
            return Err(ValidationError::TooManyRetries("geocoding"));
        }
        Ok(())
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_GEOCODING_URL.to_string()
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
