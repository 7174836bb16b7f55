//! Application handlers.
//!
//! Command handlers that orchestrate domain operations across ports.

pub mod booking;

pub use booking::{
    ConfirmRideCommand, ConfirmRideHandler, EstimateFareCommand, EstimateFareHandler,
    Fulfillment, FulfillmentReply, FulfillmentRequest, FulfillmentRouter, ProductCatalog,
    SelectRideTypeCommand, SelectRideTypeHandler, StageOutcome,
};
