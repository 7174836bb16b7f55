//! Mock RideProvider for testing.
//!
//! Provides a configurable implementation of the RideProvider port so the
//! booking stages can be exercised without calling the real API.
//!
//! # Features
//!
//! - Fixed product catalog (or an injected catalog error)
//! - Queued fare quotes and ride confirmations, consumed in order
//! - Error injection for every call
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockRideProvider::new()
//!     .with_product("p1", "uberX")
//!     .with_fare(FareQuote::new(FareId::new("f1")?, 15.0));
//!
//! let quote = provider.estimate_fare(&request, &token).await?;
//! assert_eq!(provider.estimate_requests().len(), 1);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::foundation::{AccessToken, Coordinates, ProductId};
use crate::domain::trip::{FareQuote, Product, RideConfirmation};
use crate::ports::{FareEstimateRequest, ProviderError, RideProvider, RideRequest};

/// Mock ride provider.
#[derive(Debug, Clone)]
pub struct MockRideProvider {
    catalog: Result<Vec<Product>, ProviderError>,
    fares: Arc<Mutex<VecDeque<Result<FareQuote, ProviderError>>>>,
    confirmations: Arc<Mutex<VecDeque<Result<RideConfirmation, ProviderError>>>>,
    calls: Arc<Mutex<RecordedCalls>>,
}

/// Everything the mock has been asked to do.
#[derive(Debug, Clone, Default)]
pub struct RecordedCalls {
    pub product_queries: Vec<Coordinates>,
    pub estimate_requests: Vec<FareEstimateRequest>,
    pub ride_requests: Vec<RideRequest>,
    /// Authorization header values seen on rider-authenticated calls.
    pub authorizations: Vec<String>,
}

impl Default for MockRideProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRideProvider {
    /// Creates a provider with an empty catalog and no queued responses.
    pub fn new() -> Self {
        Self {
            catalog: Ok(Vec::new()),
            fares: Arc::new(Mutex::new(VecDeque::new())),
            confirmations: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(RecordedCalls::default())),
        }
    }

    /// Appends a product to the catalog.
    pub fn with_product(mut self, id: &str, display_name: &str) -> Self {
        if let Ok(products) = &mut self.catalog {
            products.push(Product::new(ProductId::new(id), display_name));
        }
        self
    }

    /// Makes product listing fail.
    pub fn with_catalog_error(mut self, error: ProviderError) -> Self {
        self.catalog = Err(error);
        self
    }

    /// Queues a fare quote.
    pub fn with_fare(self, quote: FareQuote) -> Self {
        self.fares.lock().unwrap().push_back(Ok(quote));
        self
    }

    /// Queues a fare estimate failure.
    pub fn with_fare_error(self, error: ProviderError) -> Self {
        self.fares.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queues a ride confirmation.
    pub fn with_confirmation(self, confirmation: RideConfirmation) -> Self {
        self.confirmations.lock().unwrap().push_back(Ok(confirmation));
        self
    }

    /// Queues a ride request failure.
    pub fn with_request_error(self, error: ProviderError) -> Self {
        self.confirmations.lock().unwrap().push_back(Err(error));
        self
    }

    /// Snapshot of recorded calls.
    pub fn calls(&self) -> RecordedCalls {
        self.calls.lock().unwrap().clone()
    }

    pub fn estimate_requests(&self) -> Vec<FareEstimateRequest> {
        self.calls().estimate_requests
    }

    pub fn ride_requests(&self) -> Vec<RideRequest> {
        self.calls().ride_requests
    }
}

#[async_trait]
impl RideProvider for MockRideProvider {
    async fn list_products(&self, location: Coordinates) -> Result<Vec<Product>, ProviderError> {
        self.calls.lock().unwrap().product_queries.push(location);
        self.catalog.clone()
    }

    async fn estimate_fare(
        &self,
        request: &FareEstimateRequest,
        token: &AccessToken,
    ) -> Result<FareQuote, ProviderError> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.estimate_requests.push(request.clone());
            calls.authorizations.push(token.bearer_header());
        }
        self.fares
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::unavailable("no mock fare queued")))
    }

    async fn request_ride(
        &self,
        request: &RideRequest,
        token: &AccessToken,
    ) -> Result<RideConfirmation, ProviderError> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.ride_requests.push(request.clone());
            calls.authorizations.push(token.bearer_header());
        }
        self.confirmations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::unavailable("no mock confirmation queued")))
    }
}
