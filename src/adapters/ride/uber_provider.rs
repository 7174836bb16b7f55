//! Uber REST API implementation of RideProvider.
//!
//! - `list_products`: `GET /products?latitude&longitude` with `Token <server_token>`
//! - `estimate_fare`: `POST /requests/estimate` with the rider's bearer token
//! - `request_ride`: `POST /requests` with the rider's bearer token
//!
//! Only product listing is retried. Estimates and ride requests are sent
//! once; a duplicated ride request books a second car.
//!
//! # Configuration
//!
//! ```ignore
//! let config = UberConfig::new(server_token)
//!     .with_base_url("https://sandbox-api.uber.com/v1.2")
//!     .with_locale("en_US");
//!
//! let provider = UberRideProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::adapters::retry::{with_retries, RetryPolicy};
use crate::domain::foundation::{AccessToken, Coordinates, FareId, ProductId, TripRequestId};
use crate::domain::trip::{FareQuote, Product, RideConfirmation};
use crate::ports::{FareEstimateRequest, ProviderError, RideProvider, RideRequest};

/// Sandbox API root. Production is `https://api.uber.com/v1.2`.
pub const DEFAULT_UBER_BASE_URL: &str = "https://sandbox-api.uber.com/v1.2";

/// Configuration for the Uber provider.
#[derive(Debug, Clone)]
pub struct UberConfig {
    /// Application server token, used for product listing.
    server_token: Secret<String>,
    /// API root; every call is made relative to it.
    pub base_url: String,
    /// Sent as `Accept-Language`.
    pub locale: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Retry policy for product listing.
    pub retry: RetryPolicy,
}

impl UberConfig {
    /// Creates a new configuration with the given server token.
    pub fn new(server_token: impl Into<String>) -> Self {
        Self {
            server_token: Secret::new(server_token.into()),
            base_url: DEFAULT_UBER_BASE_URL.to_string(),
            locale: "en_US".to_string(),
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn server_token_header(&self) -> String {
        format!("Token {}", self.server_token.expose_secret())
    }
}

/// Uber API provider.
pub struct UberRideProvider {
    config: UberConfig,
    client: Client,
}

impl UberRideProvider {
    /// Creates a provider. Fails only if the HTTP client cannot be built.
    pub fn new(config: UberConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ProviderError> {
        let response = request
            .header("Accept-Language", self.config.locale.as_str())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    ProviderError::network(format!("Connection failed: {}", e))
                } else {
                    ProviderError::network(e.to_string())
                }
            })?;

        handle_response_status(response).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ProviderError> {
        self.send(request)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::parse(e.to_string()))
    }

    async fn list_products_once(&self, location: Coordinates) -> Result<Vec<Product>, ProviderError> {
        let request = self
            .client
            .get(self.url("products"))
            .query(&[("latitude", location.lat()), ("longitude", location.lng())])
            .header("Authorization", self.config.server_token_header());

        let body: ProductsResponse = self.send_json(request).await?;
        Ok(body
            .products
            .into_iter()
            .map(|p| Product::new(ProductId::new(p.product_id), p.display_name))
            .collect())
    }
}

/// Passes successful responses through; maps everything else to a ProviderError.
async fn handle_response_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);

    match status.as_u16() {
        500..=599 => Err(ProviderError::unavailable(format!(
            "Server error {}: {}",
            status, message
        ))),
        code => Err(ProviderError::rejected(code, message)),
    }
}

/// Pulls a readable message out of an Uber error body.
///
/// Uber answers either `{"message": .., "code": ..}` or
/// `{"errors": [{"title": .., "code": ..}]}`.
fn error_message(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<UberErrorBody>(body) else {
        return body.trim().to_string();
    };

    parsed
        .message
        .or_else(|| {
            parsed
                .errors
                .into_iter()
                .next()
                .and_then(|e| e.title.or(e.code))
        })
        .or(parsed.code)
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl RideProvider for UberRideProvider {
    async fn list_products(&self, location: Coordinates) -> Result<Vec<Product>, ProviderError> {
        debug!(%location, "Listing products");
        let products = with_retries(self.config.retry, "list_products", || {
            self.list_products_once(location)
        })
        .await?;
        debug!(count = products.len(), "Products listed");
        Ok(products)
    }

    async fn estimate_fare(
        &self,
        request: &FareEstimateRequest,
        token: &AccessToken,
    ) -> Result<FareQuote, ProviderError> {
        let payload = EstimatePayload {
            product_id: request.product_id.as_str(),
            start_latitude: request.route.start().lat(),
            start_longitude: request.route.start().lng(),
            end_latitude: request.route.end().lat(),
            end_longitude: request.route.end().lng(),
            seat_count: request.seat_count.get(),
        };
        debug!(product_id = %request.product_id, seats = payload.seat_count, "Requesting fare estimate");

        let http_request = self
            .client
            .post(self.url("requests/estimate"))
            .header("Authorization", token.bearer_header())
            .json(&payload);
        let body: EstimateResponse = self.send_json(http_request).await?;

        let fare = body
            .fare
            .ok_or_else(|| ProviderError::parse("Estimate response carries no fare"))?;
        let fare_id = FareId::new(fare.fare_id).map_err(|e| ProviderError::parse(e.to_string()))?;

        let mut quote = FareQuote::new(fare_id, fare.value);
        if let Some(currency) = fare.currency_code {
            quote = quote.with_currency(currency);
        }
        if let Some(display) = fare.display {
            quote = quote.with_display(display);
        }
        Ok(quote)
    }

    async fn request_ride(
        &self,
        request: &RideRequest,
        token: &AccessToken,
    ) -> Result<RideConfirmation, ProviderError> {
        let payload = RideRequestPayload {
            fare_id: request.fare_id.as_str(),
            product_id: request.product_id.as_str(),
            start_latitude: request.route.start().lat(),
            start_longitude: request.route.start().lng(),
            end_latitude: request.route.end().lat(),
            end_longitude: request.route.end().lng(),
            seat_count: request.seat_count.map(|s| s.get()),
        };

        let http_request = self
            .client
            .post(self.url("requests"))
            .header("Authorization", token.bearer_header())
            .json(&payload);
        let body: RideResponse = self.send_json(http_request).await?;

        let request_id =
            TripRequestId::new(body.request_id).map_err(|e| ProviderError::parse(e.to_string()))?;
        info!(%request_id, status = ?body.status, "Provider accepted ride request");

        let eta = body.eta.filter(|e| e.is_finite() && *e >= 0.0).map(|e| e.round() as u32);
        Ok(RideConfirmation::new(request_id, eta))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Uber API types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct EstimatePayload<'a> {
    product_id: &'a str,
    start_latitude: f64,
    start_longitude: f64,
    end_latitude: f64,
    end_longitude: f64,
    seat_count: u32,
}

#[derive(Debug, Serialize)]
struct RideRequestPayload<'a> {
    fare_id: &'a str,
    product_id: &'a str,
    start_latitude: f64,
    start_longitude: f64,
    end_latitude: f64,
    end_longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    seat_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ProductsResponse {
    #[serde(default)]
    products: Vec<UberProduct>,
}

#[derive(Debug, Deserialize)]
struct UberProduct {
    product_id: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct EstimateResponse {
    fare: Option<UberFare>,
}

#[derive(Debug, Deserialize)]
struct UberFare {
    fare_id: String,
    value: f64,
    currency_code: Option<String>,
    display: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RideResponse {
    request_id: String,
    eta: Option<f64>,
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UberErrorBody {
    message: Option<String>,
    code: Option<String>,
    #[serde(default)]
    errors: Vec<UberErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct UberErrorEntry {
    title: Option<String>,
    code: Option<String>,
}
