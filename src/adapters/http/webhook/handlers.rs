//! HTTP handler for the fulfillment webhook.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::FulfillmentRouter;
use crate::domain::trip::FulfillmentError;

use super::dto::{redact_access_token, ErrorResponse, WebhookRequest, WebhookResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct WebhookAppState {
    pub router: Arc<FulfillmentRouter>,
}

impl WebhookAppState {
    pub fn new(router: Arc<FulfillmentRouter>) -> Self {
        Self { router }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /agent/uber/fulfillment - Run one dialog turn
///
/// The body is read as raw bytes so platforms that omit or mislabel the
/// content type are still served.
pub async fn fulfill(State(state): State<WebhookAppState>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Webhook body is not valid JSON");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::invalid_json(format!("Invalid JSON body: {}", e))),
            )
                .into_response();
        }
    };
    debug!(payload = %redact_access_token(payload.clone()), "Webhook payload");

    let request = match serde_json::from_value::<WebhookRequest>(payload)
        .map_err(|e| FulfillmentError::client_payload(e.to_string()))
        .and_then(WebhookRequest::into_request)
    {
        Ok(request) => request,
        Err(err) => {
            warn!(code = %err.code(), error = %err, "Rejected webhook payload");
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(&err))).into_response();
        }
    };

    let reply = state.router.fulfill(&request).await;
    (StatusCode::OK, Json(WebhookResponse::from(reply))).into_response()
}
