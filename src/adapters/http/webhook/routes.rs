//! HTTP routes for the fulfillment webhook.

use std::time::Duration;

use axum::{routing::post, Router};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::handlers::{fulfill, WebhookAppState};

/// Path the dialog platform posts every turn to.
pub const FULFILLMENT_PATH: &str = "/agent/uber/fulfillment";

/// Creates the webhook router.
///
/// Requests get an `x-request-id` (generated unless the caller sent one),
/// which is echoed on the response.
pub fn webhook_router(state: WebhookAppState, turn_timeout: Duration) -> Router {
    Router::new()
        .route(FULFILLMENT_PATH, post(fulfill))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(turn_timeout))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}
