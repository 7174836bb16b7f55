//! FulfillmentRouter - dispatches a webhook turn to its stage.
//!
//! The router is built once at startup from the two outbound ports and
//! shared by every request. It owns no mutable state: the trip context
//! travels in the request and comes back in the reply.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::domain::foundation::AccessToken;
use crate::domain::trip::{
    keys, ContextStore, FulfillmentError, PlatformContext, Reply, Stage,
};
use crate::ports::{GeoResolver, RideProvider};

use super::confirm_ride::{ConfirmRideCommand, ConfirmRideHandler};
use super::estimate_fare::{EstimateFareCommand, EstimateFareHandler};
use super::product_catalog::ProductCatalog;
use super::select_ride_type::{SelectRideTypeCommand, SelectRideTypeHandler};
use super::stage_outcome::StageOutcome;

/// Action parameter holding the pickup address.
pub const SOURCE_PARAMETER: &str = "source";

/// Action parameter holding the drop-off address.
pub const DESTINATION_PARAMETER: &str = "destination";

/// One inbound turn, already lifted out of the platform's JSON.
#[derive(Debug, Clone)]
pub struct FulfillmentRequest {
    pub action: String,
    pub parameters: Map<String, Value>,
    pub contexts: ContextStore,
    pub access_token: Option<AccessToken>,
}

impl FulfillmentRequest {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            parameters: Map::new(),
            contexts: ContextStore::default(),
            access_token: None,
        }
    }

    pub fn with_parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_contexts(mut self, contexts: ContextStore) -> Self {
        self.contexts = contexts;
        self
    }

    pub fn with_access_token(mut self, token: Option<AccessToken>) -> Self {
        self.access_token = token;
        self
    }

    fn require_access_token(&self) -> Result<AccessToken, FulfillmentError> {
        self.access_token
            .clone()
            .ok_or(FulfillmentError::MissingAccessToken)
    }

    fn require_text(&self, name: &'static str) -> Result<String, FulfillmentError> {
        match self.parameters.get(name) {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            Some(_) => Err(FulfillmentError::client_payload(format!(
                "parameter '{}' must be a non-empty string",
                name
            ))),
            None => Err(FulfillmentError::client_payload(format!(
                "missing parameter '{}'",
                name
            ))),
        }
    }
}

/// What the router did with a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Fulfillment {
    /// A stage ran and produced a reply plus the updated trip context.
    Completed {
        stage: Stage,
        reply: Reply,
        context: PlatformContext,
    },
    /// The action belongs to some other part of the dialog agent.
    Unhandled { action: String },
}

/// Transport-ready reply. Failures are already folded into an apology.
#[derive(Debug, Clone, PartialEq)]
pub struct FulfillmentReply {
    pub reply: Reply,
    pub context_out: Option<PlatformContext>,
}

/// Routes actions to the three booking stages.
pub struct FulfillmentRouter {
    select_ride_type: SelectRideTypeHandler,
    estimate_fare: EstimateFareHandler,
    confirm_ride: ConfirmRideHandler,
}

impl FulfillmentRouter {
    pub fn new(geo: Arc<dyn GeoResolver>, provider: Arc<dyn RideProvider>) -> Self {
        let catalog = ProductCatalog::new(provider.clone());
        Self {
            select_ride_type: SelectRideTypeHandler::new(geo, catalog.clone()),
            estimate_fare: EstimateFareHandler::new(catalog, provider.clone()),
            confirm_ride: ConfirmRideHandler::new(provider),
        }
    }

    /// Runs the stage selected by the request's action.
    pub async fn route(&self, request: &FulfillmentRequest) -> Result<Fulfillment, FulfillmentError> {
        let Some(stage) = Stage::from_action(&request.action) else {
            info!(action = %request.action, "No stage for action");
            return Ok(Fulfillment::Unhandled {
                action: request.action.clone(),
            });
        };

        info!(action = %request.action, %stage, "Dispatching turn");
        let context = request.contexts.trip_context();

        let outcome: StageOutcome = match stage {
            Stage::TypeSelection => {
                let cmd = SelectRideTypeCommand {
                    source: request.require_text(SOURCE_PARAMETER)?,
                    destination: request.require_text(DESTINATION_PARAMETER)?,
                    context,
                };
                self.select_ride_type.handle(cmd).await?
            }
            Stage::Estimate => {
                let cmd = EstimateFareCommand {
                    seat_count: request.parameters.get(keys::SEAT_COUNT).cloned(),
                    access_token: request.require_access_token()?,
                    context,
                };
                self.estimate_fare.handle(cmd).await?
            }
            Stage::Confirm => {
                let cmd = ConfirmRideCommand {
                    access_token: request.require_access_token()?,
                    context,
                };
                self.confirm_ride.handle(cmd).await?
            }
        };

        Ok(Fulfillment::Completed {
            stage,
            reply: outcome.reply,
            context: request.contexts.reflect(&outcome.context),
        })
    }

    /// Like [`route`](Self::route), but never fails.
    ///
    /// A failed stage yields an apology and echoes the inbound trip context
    /// unchanged; an unhandled action yields an empty acknowledgement.
    pub async fn fulfill(&self, request: &FulfillmentRequest) -> FulfillmentReply {
        match self.route(request).await {
            Ok(Fulfillment::Completed { reply, context, .. }) => FulfillmentReply {
                reply,
                context_out: Some(context),
            },
            Ok(Fulfillment::Unhandled { .. }) => FulfillmentReply {
                reply: Reply::acknowledgement(),
                context_out: None,
            },
            Err(error) => {
                warn!(
                    action = %request.action,
                    code = %error.code(),
                    error = %error,
                    "Turn failed"
                );
                FulfillmentReply {
                    reply: Reply::apology(&error),
                    context_out: request.contexts.inbound_trip_context().cloned(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::geocoding::MockGeoResolver;
    use crate::adapters::ride::MockRideProvider;
    use crate::domain::foundation::{FareId, TripRequestId};
    use crate::domain::trip::{FareQuote, RideConfirmation, TRIP_CONTEXT_NAME};
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn provider() -> MockRideProvider {
        MockRideProvider::new()
            .with_product("p-x", "uberX")
            .with_product("p1", "uberPool")
            .with_fare(FareQuote::new(FareId::new("f1").unwrap(), 15.0))
            .with_confirmation(RideConfirmation::new(
                TripRequestId::new("trip-1").unwrap(),
                Some(8),
            ))
    }

    fn router(provider: &MockRideProvider) -> FulfillmentRouter {
        let geo = MockGeoResolver::new()
            .with_location("A", 1.0, 1.0)
            .with_location("B", 2.0, 2.0);
        FulfillmentRouter::new(Arc::new(geo), Arc::new(provider.clone()))
    }

    fn token() -> Option<AccessToken> {
        Some(AccessToken::new("rider-token").unwrap())
    }

    fn trip_context(parameters: Value) -> ContextStore {
        ContextStore::from_contexts(vec![PlatformContext {
            name: TRIP_CONTEXT_NAME.to_string(),
            lifespan: Some(5),
            parameters: params(parameters),
            extra: Map::new(),
        }])
    }

    #[tokio::test]
    async fn dispatches_type_selection() {
        let request = FulfillmentRequest::new("uber.type")
            .with_parameters(params(json!({ "source": "A", "destination": "B" })));

        let result = router(&provider()).route(&request).await.unwrap();

        match result {
            Fulfillment::Completed { stage, reply, context } => {
                assert_eq!(stage, Stage::TypeSelection);
                assert!(reply.speech.contains("uberX, uberPool"));
                assert_eq!(context.name, TRIP_CONTEXT_NAME);
                assert_eq!(context.parameters["start_latitude"], json!(1.0));
                assert_eq!(context.parameters["end_latitude"], json!(2.0));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn type_selection_replaces_unreadable_trip_values() {
        let request = FulfillmentRequest::new("uber.type")
            .with_parameters(params(json!({ "source": "A", "destination": "B" })))
            .with_contexts(trip_context(json!({
                "seat_count": "two",
                "start_latitude": "north",
                "source.original": "home"
            })));

        let reply = router(&provider()).fulfill(&request).await;

        assert!(reply.reply.speech.contains("uberX, uberPool"));
        let context = reply.context_out.unwrap();
        assert_eq!(context.parameters["start_latitude"], json!(1.0));
        assert_eq!(context.parameters["end_longitude"], json!(2.0));
        assert_eq!(context.parameters["source.original"], json!("home"));
        assert!(!context.parameters.contains_key("seat_count"));
    }

    #[tokio::test]
    async fn confirm_with_unreadable_fare_is_missing_context() {
        let provider = provider();
        let request = FulfillmentRequest::new("uber.confirm")
            .with_access_token(token())
            .with_contexts(trip_context(json!({
                "start_latitude": 1, "start_longitude": 1,
                "end_latitude": 2, "end_longitude": 2,
                "product_id": "p1",
                "fare_id": { "id": "f1" }
            })));

        let err = router(&provider).route(&request).await.unwrap_err();

        assert!(matches!(err, FulfillmentError::MissingContext { field: "fare_id" }));
        assert!(provider.ride_requests().is_empty());
    }

    #[tokio::test]
    async fn unknown_action_invokes_nothing() {
        let provider = provider();
        let request = FulfillmentRequest::new("input.welcome");

        let result = router(&provider).route(&request).await.unwrap();

        assert_eq!(
            result,
            Fulfillment::Unhandled {
                action: "input.welcome".to_string()
            }
        );
        let calls = provider.calls();
        assert!(calls.product_queries.is_empty());
        assert!(calls.estimate_requests.is_empty());
        assert!(calls.ride_requests.is_empty());
    }

    #[tokio::test]
    async fn type_selection_requires_addresses() {
        let request = FulfillmentRequest::new("uber.type")
            .with_parameters(params(json!({ "source": "A", "destination": "" })));

        let err = router(&provider()).route(&request).await.unwrap_err();
        assert!(matches!(err, FulfillmentError::ClientPayload(_)));
    }

    #[tokio::test]
    async fn estimate_requires_access_token() {
        let request = FulfillmentRequest::new("uber.estimate").with_contexts(trip_context(json!({
            "start_latitude": 1, "start_longitude": 1,
            "end_latitude": 2, "end_longitude": 2,
            "product_name": "uberX"
        })));

        let err = router(&provider()).route(&request).await.unwrap_err();
        assert_eq!(err, FulfillmentError::MissingAccessToken);
    }

    #[tokio::test]
    async fn confirm_without_fare_is_missing_context_and_calls_nothing() {
        let provider = provider();
        let request = FulfillmentRequest::new("uber.confirm")
            .with_access_token(token())
            .with_contexts(trip_context(json!({
                "start_latitude": 1, "start_longitude": 1,
                "end_latitude": 2, "end_longitude": 2,
                "product_id": "p1"
            })));

        let err = router(&provider).route(&request).await.unwrap_err();

        assert!(matches!(err, FulfillmentError::MissingContext { field: "fare_id" }));
        assert!(provider.ride_requests().is_empty());
    }

    #[tokio::test]
    async fn fulfill_echoes_inbound_context_on_failure() {
        let contexts = trip_context(json!({ "product_name": "uberX", "custom": "kept" }));
        let inbound = contexts.inbound_trip_context().cloned();
        let request = FulfillmentRequest::new("uber.confirm")
            .with_access_token(token())
            .with_contexts(contexts);

        let reply = router(&provider()).fulfill(&request).await;

        assert_eq!(reply.context_out, inbound);
        assert!(reply.reply.speech.starts_with("Sorry"));
    }

    #[tokio::test]
    async fn fulfill_acknowledges_unknown_action() {
        let reply = router(&provider())
            .fulfill(&FulfillmentRequest::new("smalltalk.greetings"))
            .await;

        assert_eq!(reply.reply, Reply::acknowledgement());
        assert!(reply.context_out.is_none());
    }

    #[tokio::test]
    async fn context_threads_through_all_three_turns() {
        let provider = provider();
        let router = router(&provider);

        // Turn 1: ride types
        let first = router
            .route(
                &FulfillmentRequest::new("uber.type")
                    .with_parameters(params(json!({ "source": "A", "destination": "B" }))),
            )
            .await
            .unwrap();
        let Fulfillment::Completed { context: mut ctx, .. } = first else {
            panic!("type selection did not complete");
        };

        // The platform fills in the rider's choice
        ctx.parameters.insert("product_name".to_string(), json!("uberPool"));

        // Turn 2: estimate
        let second = router
            .route(
                &FulfillmentRequest::new("uber.estimate")
                    .with_parameters(params(json!({ "seat_count": "3" })))
                    .with_access_token(token())
                    .with_contexts(ContextStore::from_contexts(vec![ctx])),
            )
            .await
            .unwrap();
        let Fulfillment::Completed { context: ctx, reply, .. } = second else {
            panic!("estimate did not complete");
        };
        assert!(reply.speech.contains("15"));
        assert_eq!(ctx.parameters["product_id"], json!("p1"));
        assert_eq!(ctx.parameters["fare_id"], json!("f1"));
        assert_eq!(provider.estimate_requests()[0].seat_count.get(), 3);

        // Turn 3: confirm
        let third = router
            .route(
                &FulfillmentRequest::new("uber.confirm")
                    .with_access_token(token())
                    .with_contexts(ContextStore::from_contexts(vec![ctx])),
            )
            .await
            .unwrap();
        let Fulfillment::Completed { context: ctx, reply, .. } = third else {
            panic!("confirm did not complete");
        };
        assert!(reply.speech.contains('8'));
        assert_eq!(ctx.parameters["request_id"], json!("trip-1"));
        assert_eq!(provider.ride_requests()[0].seat_count.map(|s| s.get()), Some(3));
    }
}
