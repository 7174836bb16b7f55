//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the booking dialog to external systems:
//! - `geocoding` - Address resolution (Google Geocoding, mock)
//! - `ride` - Ride-hailing provider (Uber REST API, mock)
//! - `http` - Inbound webhook endpoint for the dialog platform

pub mod geocoding;
pub mod http;
pub mod retry;
pub mod ride;

pub use geocoding::{GoogleGeocoder, GoogleGeocoderConfig, MockGeoResolver};
pub use self::http::{webhook_router, WebhookAppState};
pub use retry::RetryPolicy;
pub use ride::{MockRideProvider, UberConfig, UberRideProvider};
