//! TripContext - the trip state threaded through conversation turns.
//!
//! The dialog platform stores this state for us between turns inside a
//! named context. Each stage receives a snapshot, derives a new snapshot
//! with `with_*` methods and hands it back; nothing is mutated in place.
//!
//! Wire keys are fixed by the dialog agent's configuration and listed in
//! [`keys`]. Numbers may arrive as JSON numbers or numeric strings, and
//! blank strings are treated as absent values. A value that cannot be read
//! is dropped with a warning, so only the stage that needs it fails.

use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::foundation::{Coordinates, FareId, ProductId, SeatCount, TripRequestId};

use super::errors::FulfillmentError;
use super::route::Route;

/// Name of the dialog context carrying trip state.
pub const TRIP_CONTEXT_NAME: &str = "user_context";

/// Parameter keys shared with the dialog platform.
pub mod keys {
    pub const START_LAT: &str = "start_latitude";
    pub const START_LNG: &str = "start_longitude";
    pub const END_LAT: &str = "end_latitude";
    pub const END_LNG: &str = "end_longitude";
    pub const PRODUCT_ID: &str = "product_id";
    pub const PRODUCT_NAME: &str = "product_name";
    pub const FARE_ID: &str = "fare_id";
    pub const SEAT_COUNT: &str = "seat_count";
    pub const REQUEST_ID: &str = "request_id";

    /// Every key owned by [`super::TripContext`].
    pub const ALL: [&str; 9] = [
        START_LAT,
        START_LNG,
        END_LAT,
        END_LNG,
        PRODUCT_ID,
        PRODUCT_NAME,
        FARE_ID,
        SEAT_COUNT,
        REQUEST_ID,
    ];
}

/// Typed view of the trip fields stored in the dialog context.
///
/// All fields are optional: any turn may arrive with any subset of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripContext {
    start_lat: Option<f64>,
    start_lng: Option<f64>,
    end_lat: Option<f64>,
    end_lng: Option<f64>,
    product_id: Option<ProductId>,
    product_name: Option<String>,
    fare_id: Option<FareId>,
    seat_count: Option<SeatCount>,
    request_id: Option<TripRequestId>,
}

impl TripContext {
    /// Reads trip fields out of a context's parameter map.
    ///
    /// Keys outside the trip vocabulary are ignored. Unreadable values are
    /// logged and left absent; the next successful turn overwrites them.
    pub fn from_parameters(parameters: &Map<String, Value>) -> Self {
        Self {
            start_lat: field(parameters, keys::START_LAT, coordinate),
            start_lng: field(parameters, keys::START_LNG, coordinate),
            end_lat: field(parameters, keys::END_LAT, coordinate),
            end_lng: field(parameters, keys::END_LNG, coordinate),
            product_id: field(parameters, keys::PRODUCT_ID, |v| text(v).map(ProductId::new)),
            product_name: field(parameters, keys::PRODUCT_NAME, text),
            fare_id: field(parameters, keys::FARE_ID, |v| {
                FareId::new(text(v)?).map_err(|e| e.to_string())
            }),
            seat_count: field(parameters, keys::SEAT_COUNT, |v| {
                SeatCount::from_parameter(v).map_err(|e| e.to_string())
            }),
            request_id: field(parameters, keys::REQUEST_ID, |v| {
                TripRequestId::new(text(v)?).map_err(|e| e.to_string())
            }),
        }
    }

    /// Writes every present trip field as a parameter map.
    pub fn to_parameters(&self) -> Map<String, Value> {
        let mut map = Map::new();
        let mut put = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                map.insert(key.to_string(), value);
            }
        };

        put(keys::START_LAT, self.start_lat.map(Value::from));
        put(keys::START_LNG, self.start_lng.map(Value::from));
        put(keys::END_LAT, self.end_lat.map(Value::from));
        put(keys::END_LNG, self.end_lng.map(Value::from));
        put(keys::PRODUCT_ID, self.product_id.as_ref().map(|id| Value::from(id.as_str())));
        put(keys::PRODUCT_NAME, self.product_name.clone().map(Value::from));
        put(keys::FARE_ID, self.fare_id.as_ref().map(|id| Value::from(id.as_str())));
        put(keys::SEAT_COUNT, self.seat_count.map(|s| Value::from(s.get())));
        put(keys::REQUEST_ID, self.request_id.as_ref().map(|id| Value::from(id.as_str())));
        map
    }

    // ─────────────────────────────────────────────────────────────────
    // Required-field accessors (fail fast on absence)
    // ─────────────────────────────────────────────────────────────────

    /// Returns the pickup and drop-off coordinates written by ride type selection.
    pub fn route(&self) -> Result<Route, FulfillmentError> {
        let start_lat = require(self.start_lat, keys::START_LAT)?;
        let start_lng = require(self.start_lng, keys::START_LNG)?;
        let end_lat = require(self.end_lat, keys::END_LAT)?;
        let end_lng = require(self.end_lng, keys::END_LNG)?;

        let start = Coordinates::new(start_lat, start_lng)
            .map_err(|e| FulfillmentError::client_payload(e.to_string()))?;
        let end = Coordinates::new(end_lat, end_lng)
            .map_err(|e| FulfillmentError::client_payload(e.to_string()))?;
        Ok(Route::new(start, end))
    }

    /// Returns the product label the rider picked.
    pub fn require_product_name(&self) -> Result<&str, FulfillmentError> {
        self.product_name
            .as_deref()
            .ok_or(FulfillmentError::missing_context(keys::PRODUCT_NAME))
    }

    /// Returns the product resolved during fare estimation.
    pub fn require_product_id(&self) -> Result<&ProductId, FulfillmentError> {
        self.product_id
            .as_ref()
            .ok_or(FulfillmentError::missing_context(keys::PRODUCT_ID))
    }

    /// Returns the fare quote obtained during fare estimation.
    pub fn require_fare_id(&self) -> Result<&FareId, FulfillmentError> {
        self.fare_id
            .as_ref()
            .ok_or(FulfillmentError::missing_context(keys::FARE_ID))
    }

    // ─────────────────────────────────────────────────────────────────
    // Plain accessors
    // ─────────────────────────────────────────────────────────────────

    pub fn start_lat(&self) -> Option<f64> {
        self.start_lat
    }

    pub fn start_lng(&self) -> Option<f64> {
        self.start_lng
    }

    pub fn end_lat(&self) -> Option<f64> {
        self.end_lat
    }

    pub fn end_lng(&self) -> Option<f64> {
        self.end_lng
    }

    pub fn product_id(&self) -> Option<&ProductId> {
        self.product_id.as_ref()
    }

    pub fn product_name(&self) -> Option<&str> {
        self.product_name.as_deref()
    }

    pub fn fare_id(&self) -> Option<&FareId> {
        self.fare_id.as_ref()
    }

    pub fn seat_count(&self) -> Option<SeatCount> {
        self.seat_count
    }

    pub fn request_id(&self) -> Option<&TripRequestId> {
        self.request_id.as_ref()
    }

    // ─────────────────────────────────────────────────────────────────
    // Snapshot derivation
    // ─────────────────────────────────────────────────────────────────

    /// Sets the four coordinate fields, leaving everything else as is.
    pub fn with_route(mut self, route: Route) -> Self {
        self.start_lat = Some(route.start().lat());
        self.start_lng = Some(route.start().lng());
        self.end_lat = Some(route.end().lat());
        self.end_lng = Some(route.end().lng());
        self
    }

    /// Sets the product label (normally supplied by the dialog platform).
    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    /// Records a fare quote. `seat_count` is only kept for pooled products.
    pub fn with_quote(
        mut self,
        product_id: ProductId,
        fare_id: FareId,
        seat_count: Option<SeatCount>,
    ) -> Self {
        self.product_id = Some(product_id);
        self.fare_id = Some(fare_id);
        self.seat_count = seat_count;
        self
    }

    /// Records the trip created by the ride provider.
    pub fn with_request_id(mut self, request_id: TripRequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, FulfillmentError> {
    value.ok_or(FulfillmentError::missing_context(field))
}

// ─────────────────────────────────────────────────────────────────────
// Lenient field readers
// ─────────────────────────────────────────────────────────────────────

fn field<T>(
    parameters: &Map<String, Value>,
    key: &'static str,
    parse: impl FnOnce(&Value) -> Result<T, String>,
) -> Option<T> {
    let value = match parameters.get(key) {
        None | Some(Value::Null) => return None,
        Some(Value::String(s)) if s.trim().is_empty() => return None,
        Some(value) => value,
    };

    match parse(value) {
        Ok(parsed) => Some(parsed),
        Err(reason) => {
            warn!(field = key, %value, %reason, "Ignoring unreadable trip context value");
            None
        }
    }
}

fn coordinate(value: &Value) -> Result<f64, String> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| "not a coordinate".to_string())
}

fn text(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err("expected a string".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn sample_route() -> Route {
        Route::new(
            Coordinates::new(1.0, 1.0).unwrap(),
            Coordinates::new(2.0, 2.0).unwrap(),
        )
    }

    #[test]
    fn empty_parameters_yield_empty_context() {
        let ctx = TripContext::from_parameters(&Map::new());
        assert_eq!(ctx, TripContext::default());
    }

    #[test]
    fn reads_numbers_and_numeric_strings() {
        let ctx = TripContext::from_parameters(&params(json!({
            "start_latitude": 1.5,
            "start_longitude": "2.5",
            "end_latitude": 3,
            "end_longitude": " 4 ",
            "seat_count": "3"
        })));

        assert_eq!(ctx.start_lat(), Some(1.5));
        assert_eq!(ctx.start_lng(), Some(2.5));
        assert_eq!(ctx.end_lat(), Some(3.0));
        assert_eq!(ctx.end_lng(), Some(4.0));
        assert_eq!(ctx.seat_count().map(|s| s.get()), Some(3));
    }

    #[test]
    fn blank_values_are_absent() {
        let ctx = TripContext::from_parameters(&params(json!({
            "product_name": "",
            "fare_id": "  ",
            "product_id": null,
            "start_latitude": ""
        })));

        assert_eq!(ctx, TripContext::default());
    }

    #[test]
    fn ignores_keys_outside_vocabulary() {
        let ctx = TripContext::from_parameters(&params(json!({
            "product_name": "uberX",
            "product_name.original": "uber x"
        })));

        assert_eq!(ctx.product_name(), Some("uberX"));
    }

    #[test]
    fn unreadable_values_are_dropped() {
        let ctx = TripContext::from_parameters(&params(json!({
            "start_latitude": "north",
            "end_latitude": "NaN",
            "seat_count": "two",
            "fare_id": {},
            "request_id": [1],
            "product_name": true
        })));

        assert_eq!(ctx, TripContext::default());
    }

    #[test]
    fn unreadable_value_does_not_hide_its_neighbours() {
        let ctx = TripContext::from_parameters(&params(json!({
            "seat_count": "0",
            "start_latitude": "north",
            "start_longitude": 2.0,
            "product_name": "uberX",
            "fare_id": "f1"
        })));

        assert!(ctx.seat_count().is_none());
        assert!(ctx.start_lat().is_none());
        assert_eq!(ctx.start_lng(), Some(2.0));
        assert_eq!(ctx.product_name(), Some("uberX"));
        assert_eq!(ctx.fare_id().map(|f| f.as_str()), Some("f1"));
        assert_eq!(
            ctx.route().unwrap_err(),
            FulfillmentError::missing_context(keys::START_LAT)
        );
    }

    #[test]
    fn route_requires_all_four_coordinates() {
        let ctx = TripContext::from_parameters(&params(json!({
            "start_latitude": 1.0,
            "start_longitude": 1.0,
            "end_latitude": 2.0
        })));

        assert_eq!(
            ctx.route().unwrap_err(),
            FulfillmentError::missing_context(keys::END_LNG)
        );
    }

    #[test]
    fn with_route_sets_only_coordinates() {
        let ctx = TripContext::default()
            .with_product_name("uberX")
            .with_route(sample_route());

        assert_eq!(ctx.start_lat(), Some(1.0));
        assert_eq!(ctx.end_lng(), Some(2.0));
        assert_eq!(ctx.product_name(), Some("uberX"));
        assert!(ctx.fare_id().is_none());
        assert_eq!(ctx.route().unwrap(), sample_route());
    }

    #[test]
    fn required_accessors_report_missing_field() {
        let ctx = TripContext::default();
        assert_eq!(
            ctx.require_product_name().unwrap_err(),
            FulfillmentError::missing_context(keys::PRODUCT_NAME)
        );
        assert_eq!(
            ctx.require_fare_id().unwrap_err(),
            FulfillmentError::missing_context(keys::FARE_ID)
        );
        assert_eq!(
            ctx.require_product_id().unwrap_err(),
            FulfillmentError::missing_context(keys::PRODUCT_ID)
        );
    }

    #[test]
    fn to_parameters_writes_wire_keys() {
        let ctx = TripContext::default()
            .with_route(sample_route())
            .with_quote(
                ProductId::new("p1"),
                FareId::new("f1").unwrap(),
                Some(SeatCount::new(3).unwrap()),
            )
            .with_request_id(TripRequestId::new("r1").unwrap());

        let map = ctx.to_parameters();
        assert_eq!(map["start_latitude"], json!(1.0));
        assert_eq!(map["end_longitude"], json!(2.0));
        assert_eq!(map["product_id"], json!("p1"));
        assert_eq!(map["fare_id"], json!("f1"));
        assert_eq!(map["seat_count"], json!(3));
        assert_eq!(map["request_id"], json!("r1"));
        assert!(!map.contains_key("product_name"));
    }

    #[test]
    fn parameters_read_back_into_same_context() {
        let ctx = TripContext::default()
            .with_route(sample_route())
            .with_product_name("uberPool");

        let reread = TripContext::from_parameters(&ctx.to_parameters());
        assert_eq!(reread, ctx);
    }
}
