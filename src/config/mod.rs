//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `RIDE_CONCIERGE` prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use ride_concierge::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod geocoding;
mod ride_provider;
mod server;

pub use error::{ConfigError, ValidationError};
pub use geocoding::GeocodingConfig;
pub use ride_provider::RideProviderConfig;
pub use server::{LogFormat, ServerConfig, PLATFORM_DEADLINE_MS};

use serde::Deserialize;

/// Upper bound on retries for any outbound service.
const MAX_RETRIES: u32 = 5;

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Listener, turn deadline and log output
    #[serde(default)]
    pub server: ServerConfig,

    /// Geocoding configuration (Google Geocoding)
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Ride provider configuration (Uber)
    pub ride_provider: RideProviderConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `RIDE_CONCIERGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `RIDE_CONCIERGE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `RIDE_CONCIERGE__RIDE_PROVIDER__SERVER_TOKEN=...` -> `ride_provider.server_token = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("RIDE_CONCIERGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.geocoding.validate()?;
        self.ride_provider.validate()?;
        Ok(())
    }
}
