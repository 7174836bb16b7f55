//! Ride provider adapters.

mod mock_provider;
mod uber_provider;

pub use mock_provider::{MockRideProvider, RecordedCalls};
pub use uber_provider::{UberConfig, UberRideProvider, DEFAULT_UBER_BASE_URL};
