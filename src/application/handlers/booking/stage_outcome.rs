//! Result of a successfully completed stage.

use crate::domain::trip::{Reply, TripContext};

/// Reply for the rider plus the trip snapshot to hand back to the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutcome {
    pub reply: Reply,
    pub context: TripContext,
}

impl StageOutcome {
    pub fn new(reply: Reply, context: TripContext) -> Self {
        Self { reply, context }
    }
}
