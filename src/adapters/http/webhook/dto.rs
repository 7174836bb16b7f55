//! Wire types for the dialog platform's fulfillment webhook.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::{FulfillmentReply, FulfillmentRequest};
use crate::domain::foundation::{AccessToken, ErrorCode};
use crate::domain::trip::{ContextStore, FulfillmentError, PlatformContext};

/// Placeholder written over the access token before a payload is logged.
pub const REDACTED: &str = "[REDACTED]";

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Inbound webhook body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    pub result: Option<WebhookResult>,
    pub original_request: Option<OriginalRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookResult {
    pub action: Option<String>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub contexts: Vec<PlatformContext>,
}

/// The originating chat surface's request; only the linked account is read.
#[derive(Debug, Clone, Deserialize)]
pub struct OriginalRequest {
    pub data: Option<OriginalRequestData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OriginalRequestData {
    pub user: Option<PlatformUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformUser {
    pub access_token: Option<String>,
}

impl WebhookRequest {
    fn access_token(&self) -> Option<&str> {
        self.original_request
            .as_ref()?
            .data
            .as_ref()?
            .user
            .as_ref()?
            .access_token
            .as_deref()
    }

    /// Lifts the body into a routable request.
    ///
    /// A missing `result` or action is a client error. A blank access token
    /// is treated as absent; stages that need it will refuse the turn.
    pub fn into_request(self) -> Result<FulfillmentRequest, FulfillmentError> {
        let token = self.access_token().and_then(|t| AccessToken::new(t).ok());

        let result = self
            .result
            .ok_or_else(|| FulfillmentError::client_payload("missing 'result'"))?;
        let action = result
            .action
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| FulfillmentError::client_payload("missing 'result.action'"))?;

        Ok(FulfillmentRequest::new(action)
            .with_parameters(result.parameters)
            .with_contexts(ContextStore::from_contexts(result.contexts))
            .with_access_token(token))
    }
}

/// Copy of a raw payload with the rider's access token masked, for logging.
pub fn redact_access_token(mut payload: Value) -> Value {
    if let Some(token) = payload
        .pointer_mut("/originalRequest/data/user/access_token")
        .filter(|t| !t.is_null())
    {
        *token = Value::String(REDACTED.to_string());
    }
    payload
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Outbound webhook body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub display_text: String,
    pub speech: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub context_out: Vec<PlatformContext>,
}

impl From<FulfillmentReply> for WebhookResponse {
    fn from(reply: FulfillmentReply) -> Self {
        Self {
            display_text: reply.reply.display_text,
            speech: reply.reply.speech,
            context_out: reply.context_out.into_iter().collect(),
        }
    }
}

/// Body of a 4xx answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.to_string(),
                message: message.into(),
            },
        }
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidPayload, message)
    }
}

impl From<&FulfillmentError> for ErrorResponse {
    fn from(error: &FulfillmentError) -> Self {
        Self::new(error.code(), error.to_string())
    }
}
