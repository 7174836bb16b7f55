//! Geocoding adapters.

mod google_geocoder;
mod mock_resolver;

pub use google_geocoder::{GoogleGeocoder, GoogleGeocoderConfig, DEFAULT_GEOCODING_URL};
pub use mock_resolver::MockGeoResolver;
