//! Mock GeoResolver for testing.
//!
//! Resolves addresses from a fixed table and records every lookup so tests
//! can verify which addresses were geocoded.
//!
//! # Example
//!
//! ```ignore
//! let geo = MockGeoResolver::new()
//!     .with_location("A", 1.0, 1.0)
//!     .with_error("Atlantis", GeoError::no_match("Atlantis"));
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::foundation::Coordinates;
use crate::ports::{GeoError, GeoResolver};

/// Table-driven geocoder. Unknown addresses yield `GeoError::NoMatch`.
#[derive(Debug, Clone, Default)]
pub struct MockGeoResolver {
    results: HashMap<String, Result<Coordinates, GeoError>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockGeoResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps an address to a location.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of range.
    pub fn with_location(mut self, address: impl Into<String>, lat: f64, lng: f64) -> Self {
        let coordinates = Coordinates::new(lat, lng).expect("mock coordinates must be valid");
        self.results.insert(address.into(), Ok(coordinates));
        self
    }

    /// Makes an address fail with the given error.
    pub fn with_error(mut self, address: impl Into<String>, error: GeoError) -> Self {
        self.results.insert(address.into(), Err(error));
        self
    }

    /// Addresses resolved so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeoResolver for MockGeoResolver {
    async fn resolve(&self, address: &str) -> Result<Coordinates, GeoError> {
        self.calls.lock().unwrap().push(address.to_string());
        self.results
            .get(address)
            .cloned()
            .unwrap_or_else(|| Err(GeoError::no_match(address)))
    }
}
