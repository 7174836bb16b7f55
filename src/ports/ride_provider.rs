//! RideProvider Port - Interface for the ride-hailing REST API.
//!
//! Covers the three calls the booking dialog needs:
//!
//! - product listing at a location (application credentials)
//! - fare estimation for a product and route (rider credentials)
//! - ride request creation from a fare quote (rider credentials)
//!
//! # Example
//!
//! ```ignore
//! let products = provider.list_products(pickup).await?;
//! let quote = provider
//!     .estimate_fare(&FareEstimateRequest::new(product_id, route, seats), &token)
//!     .await?;
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{
    AccessToken, Coordinates, ErrorCode, FareId, ProductId, SeatCount,
};
use crate::domain::trip::{FareQuote, Product, RideConfirmation, Route};

/// Port for ride provider interactions.
///
/// Implementations translate between the provider's wire format and the
/// trip domain types.
#[async_trait]
pub trait RideProvider: Send + Sync {
    /// Lists products available at a location, in provider order.
    async fn list_products(&self, location: Coordinates) -> Result<Vec<Product>, ProviderError>;

    /// Requests a fare quote on behalf of the rider.
    async fn estimate_fare(
        &self,
        request: &FareEstimateRequest,
        token: &AccessToken,
    ) -> Result<FareQuote, ProviderError>;

    /// Books a ride from a previously issued fare quote.
    async fn request_ride(
        &self,
        request: &RideRequest,
        token: &AccessToken,
    ) -> Result<RideConfirmation, ProviderError>;
}

/// Input for a fare estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct FareEstimateRequest {
    pub product_id: ProductId,
    pub route: Route,
    pub seat_count: SeatCount,
}

impl FareEstimateRequest {
    pub fn new(product_id: ProductId, route: Route, seat_count: SeatCount) -> Self {
        Self {
            product_id,
            route,
            seat_count,
        }
    }
}

/// Input for a ride request.
#[derive(Debug, Clone, PartialEq)]
pub struct RideRequest {
    pub fare_id: FareId,
    pub product_id: ProductId,
    pub route: Route,
    /// Only set for pooled products.
    pub seat_count: Option<SeatCount>,
}

impl RideRequest {
    pub fn new(fare_id: FareId, product_id: ProductId, route: Route) -> Self {
        Self {
            fare_id,
            product_id,
            route,
            seat_count: None,
        }
    }

    pub fn with_seat_count(mut self, seat_count: Option<SeatCount>) -> Self {
        self.seat_count = seat_count;
        self
    }
}

/// Errors from the ride provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status.
    #[error("Provider rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The provider returned a server error.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// The provider could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// Response could not be parsed.
    #[error("Failed to parse provider response: {0}")]
    Parse(String),
}

impl ProviderError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        ProviderError::Rejected {
            status,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        ProviderError::Unavailable(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        ProviderError::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        ProviderError::Parse(message.into())
    }

    /// Whether a retry might succeed. Rate limiting counts as transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Rejected { status, .. } => *status == 429,
            ProviderError::Unavailable(_)
            | ProviderError::Network(_)
            | ProviderError::Timeout { .. } => true,
            ProviderError::Parse(_) => false,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ProviderError::Rejected { .. } => ErrorCode::ProviderRejected,
            ProviderError::Timeout { .. } => ErrorCode::ProviderTimeout,
            ProviderError::Unavailable(_)
            | ProviderError::Network(_)
            | ProviderError::Parse(_) => ErrorCode::ProviderUnavailable,
        }
    }
}
