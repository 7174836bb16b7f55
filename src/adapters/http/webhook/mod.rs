//! HTTP adapter for the dialog platform's fulfillment webhook.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    redact_access_token, ErrorDetail, ErrorResponse, WebhookRequest, WebhookResponse, REDACTED,
};
pub use handlers::WebhookAppState;
pub use routes::{webhook_router, FULFILLMENT_PATH};
