//! Trip module - state and vocabulary of the three-turn booking dialog.
//!
//! - `TripContext` - typed snapshot of the trip fields stored by the dialog platform
//! - `ContextStore` - keyed lookup and reflection of platform contexts
//! - `Stage` - ride type selection, fare estimate, confirmation
//! - `Reply` - what the rider hears and sees
//! - `FulfillmentError` - why a turn failed

mod context;
mod context_store;
mod errors;
mod product;
mod quote;
mod reply;
mod route;
mod stage;

pub use context::{keys, TripContext, TRIP_CONTEXT_NAME};
pub use context_store::{ContextStore, PlatformContext, DEFAULT_CONTEXT_LIFESPAN};
pub use errors::FulfillmentError;
pub use product::{is_pooled, Product, POOLED_PRODUCT_LABEL};
pub use quote::{FareQuote, RideConfirmation};
pub use reply::Reply;
pub use route::Route;
pub use stage::Stage;
