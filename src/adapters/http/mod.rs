//! HTTP adapters - inbound endpoints.

pub mod webhook;

pub use webhook::{webhook_router, WebhookAppState, FULFILLMENT_PATH};
