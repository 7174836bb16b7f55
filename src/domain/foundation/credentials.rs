//! Caller credentials forwarded to the ride provider.
//!
//! The dialog platform performs account linking and hands us the rider's
//! OAuth access token on every turn. It is kept behind `secrecy::Secret`
//! so it never shows up in `Debug` output or logs.

use secrecy::{ExposeSecret, Secret};

use super::ValidationError;

/// A rider's OAuth bearer token.
#[derive(Debug, Clone)]
pub struct AccessToken(Secret<String>);

impl AccessToken {
    /// Creates a new AccessToken, returning error if blank.
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ValidationError::empty_field("access_token"));
        }
        Ok(Self(Secret::new(token)))
    }

    /// Value for an `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_token() {
        assert!(AccessToken::new("").is_err());
        assert!(AccessToken::new("   ").is_err());
    }

    #[test]
    fn builds_bearer_header() {
        let token = AccessToken::new("abc").unwrap();
        assert_eq!(token.bearer_header(), "Bearer abc");
    }

    #[test]
    fn debug_output_redacts_token() {
        let token = AccessToken::new("super-secret").unwrap();
        assert!(!format!("{:?}", token).contains("super-secret"));
    }
}
