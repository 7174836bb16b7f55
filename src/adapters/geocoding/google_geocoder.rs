//! Google Geocoding API implementation of GeoResolver.
//!
//! Issues `GET {base_url}?address=...&key=...` and keeps the first result's
//! `geometry.location`. Transient failures are retried with backoff; a
//! `ZERO_RESULTS` answer is reported as `GeoError::NoMatch`.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GoogleGeocoderConfig::new()
//!     .with_api_key(key)
//!     .with_timeout(Duration::from_secs(5));
//!
//! let geocoder = GoogleGeocoder::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::adapters::retry::{with_retries, RetryPolicy};
use crate::domain::foundation::Coordinates;
use crate::ports::{GeoError, GeoResolver};

/// Public Google Geocoding endpoint.
pub const DEFAULT_GEOCODING_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Configuration for the Google geocoder.
#[derive(Debug, Clone)]
pub struct GoogleGeocoderConfig {
    /// API key; omitted from the query when absent.
    api_key: Option<Secret<String>>,
    /// Full endpoint URL.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Retry policy for transient failures.
    pub retry: RetryPolicy,
}

impl GoogleGeocoderConfig {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GEOCODING_URL.to_string(),
            timeout: Duration::from_secs(5),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
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
}

impl Default for GoogleGeocoderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Geocoder backed by the Google Geocoding API.
pub struct GoogleGeocoder {
    config: GoogleGeocoderConfig,
    client: Client,
}

impl GoogleGeocoder {
    /// Creates a geocoder. Fails only if the HTTP client cannot be built.
    pub fn new(config: GoogleGeocoderConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    async fn send(&self, address: &str) -> Result<Response, GeoError> {
        let mut query = vec![("address", address.to_string())];
        if let Some(key) = &self.config.api_key {
            query.push(("key", key.expose_secret().clone()));
        }

        self.client
            .get(&self.config.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeoError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else {
                    GeoError::unavailable(e.to_string())
                }
            })
    }

    async fn resolve_once(&self, address: &str) -> Result<Coordinates, GeoError> {
        let response = self.send(address).await?;
        let status = response.status();

        if status.is_server_error() || status.as_u16() == 429 {
            let body = response.text().await.unwrap_or_default();
            return Err(GeoError::unavailable(format!("HTTP {}: {}", status, body)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeoError::Rejected {
                status: status.as_u16().to_string(),
                message: body,
            });
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| GeoError::parse(e.to_string()))?;

        first_location(address, body)
    }
}

/// Interprets a geocoding payload, keeping only the first match.
fn first_location(address: &str, body: GeocodeResponse) -> Result<Coordinates, GeoError> {
    match body.status.as_deref() {
        None | Some("OK") => {}
        Some("ZERO_RESULTS") => return Err(GeoError::no_match(address)),
        Some(status @ ("OVER_QUERY_LIMIT" | "UNKNOWN_ERROR")) => {
            return Err(GeoError::unavailable(status.to_string()))
        }
        Some(other) => {
            return Err(GeoError::Rejected {
                status: other.to_string(),
                message: body.error_message.unwrap_or_default(),
            })
        }
    }

    let first = body
        .results
        .into_iter()
        .next()
        .ok_or_else(|| GeoError::no_match(address))?;
    let location = first.geometry.location;

    Coordinates::new(location.lat, location.lng).map_err(|e| GeoError::parse(e.to_string()))
}

#[async_trait]
impl GeoResolver for GoogleGeocoder {
    async fn resolve(&self, address: &str) -> Result<Coordinates, GeoError> {
        debug!(address, "Geocoding address");
        let coordinates =
            with_retries(self.config.retry, "geocode", || self.resolve_once(address)).await?;
        debug!(address, %coordinates, "Address resolved");
        Ok(coordinates)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Google API types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    status: Option<String>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/geocode/json", addr)
    }

    fn geocoder(base_url: String) -> GoogleGeocoder {
        let config = GoogleGeocoderConfig::new()
            .with_base_url(base_url)
            .with_api_key("maps-key")
            .with_retry(RetryPolicy::new(2, Duration::from_millis(1)));
        GoogleGeocoder::new(config).unwrap()
    }

    fn parse(body: Value) -> GeocodeResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn first_result_wins() {
        let body = parse(json!({
            "status": "OK",
            "results": [
                {"geometry": {"location": {"lat": 12.97, "lng": 77.59}}},
                {"geometry": {"location": {"lat": 1.0, "lng": 1.0}}}
            ]
        }));

        let coords = first_location("MG Road", body).unwrap();
        assert_eq!(coords, Coordinates::new(12.97, 77.59).unwrap());
    }

    #[test]
    fn zero_results_is_no_match() {
        let body = parse(json!({"status": "ZERO_RESULTS", "results": []}));
        assert_eq!(
            first_location("nowhere", body),
            Err(GeoError::no_match("nowhere"))
        );
    }

    #[test]
    fn ok_with_empty_results_is_no_match() {
        let body = parse(json!({"status": "OK", "results": []}));
        assert!(matches!(
            first_location("x", body),
            Err(GeoError::NoMatch { .. })
        ));
    }

    #[test]
    fn denied_request_is_rejected_with_message() {
        let body = parse(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        }));

        match first_location("x", body) {
            Err(GeoError::Rejected { status, message }) => {
                assert_eq!(status, "REQUEST_DENIED");
                assert!(message.contains("invalid"));
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn quota_exhaustion_is_transient() {
        let body = parse(json!({"status": "OVER_QUERY_LIMIT", "results": []}));
        assert!(first_location("x", body).unwrap_err().is_retryable());
    }

    #[test]
    fn out_of_range_location_is_a_parse_error() {
        let body = parse(json!({
            "status": "OK",
            "results": [{"geometry": {"location": {"lat": 123.0, "lng": 0.0}}}]
        }));
        assert!(matches!(first_location("x", body), Err(GeoError::Parse(_))));
    }

    #[tokio::test]
    async fn sends_address_and_key_as_query() {
        let seen = Arc::new(Mutex::new(Vec::<HashMap<String, String>>::new()));
        let recorder = seen.clone();
        let app = Router::new().route(
            "/geocode/json",
            get(move |Query(query): Query<HashMap<String, String>>| {
                let recorder = recorder.clone();
                async move {
                    recorder.lock().unwrap().push(query);
                    Json(json!({
                        "status": "OK",
                        "results": [{"geometry": {"location": {"lat": 12.9716, "lng": 77.5946}}}]
                    }))
                }
            }),
        );
        let geocoder = geocoder(serve(app).await);

        let coords = geocoder.resolve("MG Road, Bangalore").await.unwrap();

        assert_eq!(coords, Coordinates::new(12.9716, 77.5946).unwrap());
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["address"], "MG Road, Bangalore");
        assert_eq!(seen[0]["key"], "maps-key");
    }

    #[tokio::test]
    async fn retries_server_errors() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/geocode/json",
            get(move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({})))
                    } else {
                        (
                            StatusCode::OK,
                            Json(json!({
                                "status": "OK",
                                "results": [{"geometry": {"location": {"lat": 1.5, "lng": 2.5}}}]
                            })),
                        )
                    }
                }
            }),
        );
        let geocoder = geocoder(serve(app).await);

        let coords = geocoder.resolve("anywhere").await.unwrap();

        assert_eq!(coords, Coordinates::new(1.5, 2.5).unwrap());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/geocode/json",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (StatusCode::FORBIDDEN, "forbidden")
                }
            }),
        );
        let geocoder = geocoder(serve(app).await);

        let err = geocoder.resolve("anywhere").await.unwrap_err();

        assert!(matches!(err, GeoError::Rejected { ref status, .. } if status == "403"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
