//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that form the
//! vocabulary of the ride booking domain.

mod coordinates;
mod credentials;
mod errors;
mod ids;
mod seat_count;

pub use coordinates::Coordinates;
pub use credentials::AccessToken;
pub use errors::{ErrorCode, ValidationError};
pub use ids::{FareId, ProductId, TripRequestId};
pub use seat_count::SeatCount;
