//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the booking dialog and the outside world. Adapters implement these ports.
//!
//! - `GeoResolver` - address to coordinates
//! - `RideProvider` - product catalog, fare estimates and ride requests

mod geo_resolver;
mod ride_provider;

pub use geo_resolver::{GeoError, GeoResolver};
pub use ride_provider::{FareEstimateRequest, ProviderError, RideProvider, RideRequest};
