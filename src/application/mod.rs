//! Application layer - stage handlers and routing.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    Fulfillment, FulfillmentReply, FulfillmentRequest, FulfillmentRouter, ProductCatalog,
    StageOutcome,
};
