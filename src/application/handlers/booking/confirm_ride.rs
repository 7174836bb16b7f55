//! ConfirmRideHandler - final turn: book the quoted ride.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::AccessToken;
use crate::domain::trip::{FulfillmentError, Reply, TripContext};
use crate::ports::{RideProvider, RideRequest};

use super::stage_outcome::StageOutcome;

/// Command to request the ride quoted in the trip context.
#[derive(Debug, Clone)]
pub struct ConfirmRideCommand {
    pub access_token: AccessToken,
    pub context: TripContext,
}

/// Handler for ride confirmation.
pub struct ConfirmRideHandler {
    provider: Arc<dyn RideProvider>,
}

impl ConfirmRideHandler {
    pub fn new(provider: Arc<dyn RideProvider>) -> Self {
        Self { provider }
    }

    pub async fn handle(&self, cmd: ConfirmRideCommand) -> Result<StageOutcome, FulfillmentError> {
        // 1. Everything the quote turn wrote must be present before we call out
        let fare_id = cmd.context.require_fare_id()?.clone();
        let product_id = cmd.context.require_product_id()?.clone();
        let route = cmd.context.route()?;

        let request = RideRequest::new(fare_id, product_id, route)
            .with_seat_count(cmd.context.seat_count());

        // 2. Book; nothing was written speculatively, so failures need no rollback
        let confirmation = self
            .provider
            .request_ride(&request, &cmd.access_token)
            .await?;

        info!(
            request_id = %confirmation.request_id,
            eta_minutes = ?confirmation.eta_minutes,
            "Ride requested"
        );

        // 3. Record the trip
        let reply = Reply::booking_confirmed(&confirmation);
        let context = cmd.context.with_request_id(confirmation.request_id);
        Ok(StageOutcome::new(reply, context))
    }
}
