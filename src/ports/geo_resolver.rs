//! GeoResolver Port - turns free-text addresses into coordinates.
//!
//! Implementations call an external geocoding service and keep only the
//! first match. An empty result set is an error, never a default point.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::Coordinates;

/// Port for address geocoding.
#[async_trait]
pub trait GeoResolver: Send + Sync {
    /// Resolves an address to the coordinates of the provider's first match.
    async fn resolve(&self, address: &str) -> Result<Coordinates, GeoError>;
}

/// Geocoding failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// The provider returned no results for the address.
    #[error("No geocoding results for '{address}'")]
    NoMatch { address: String },

    /// The provider refused the request (bad key, quota, invalid request).
    #[error("Geocoding request rejected ({status}): {message}")]
    Rejected { status: String, message: String },

    /// Provider returned a server error or could not be reached.
    #[error("Geocoding service unavailable: {0}")]
    Unavailable(String),

    /// Request timed out.
    #[error("Geocoding request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// Response could not be parsed.
    #[error("Failed to parse geocoding response: {0}")]
    Parse(String),
}

impl GeoError {
    pub fn no_match(address: impl Into<String>) -> Self {
        GeoError::NoMatch {
            address: address.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        GeoError::Unavailable(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        GeoError::Parse(message.into())
    }

    /// Whether a retry might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GeoError::Unavailable(_) | GeoError::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_errors_are_retryable() {
        assert!(GeoError::unavailable("503").is_retryable());
        assert!(GeoError::Timeout { timeout_secs: 5 }.is_retryable());
        assert!(!GeoError::no_match("x").is_retryable());
        assert!(!GeoError::parse("bad json").is_retryable());
    }
}
