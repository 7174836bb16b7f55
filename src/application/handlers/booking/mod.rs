//! Booking handlers - the three dialog stages and their router.

mod confirm_ride;
mod estimate_fare;
mod fulfillment_router;
mod product_catalog;
mod select_ride_type;
mod stage_outcome;

pub use confirm_ride::{ConfirmRideCommand, ConfirmRideHandler};
pub use estimate_fare::{EstimateFareCommand, EstimateFareHandler};
pub use fulfillment_router::{
    Fulfillment, FulfillmentReply, FulfillmentRequest, FulfillmentRouter, DESTINATION_PARAMETER,
    SOURCE_PARAMETER,
};
pub use product_catalog::ProductCatalog;
pub use select_ride_type::{SelectRideTypeCommand, SelectRideTypeHandler};
pub use stage_outcome::StageOutcome;
