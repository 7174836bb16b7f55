//! EstimateFareHandler - second turn: price quote for the chosen product.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::domain::foundation::{AccessToken, SeatCount};
use crate::domain::trip::{is_pooled, keys, FulfillmentError, Reply, TripContext};
use crate::ports::{FareEstimateRequest, RideProvider};

use super::product_catalog::ProductCatalog;
use super::stage_outcome::StageOutcome;

/// Command to quote a fare for the product named in the trip context.
#[derive(Debug, Clone)]
pub struct EstimateFareCommand {
    /// Raw `seat_count` action parameter, if the rider gave one.
    pub seat_count: Option<Value>,
    pub access_token: AccessToken,
    pub context: TripContext,
}

/// Handler for fare estimation.
pub struct EstimateFareHandler {
    catalog: ProductCatalog,
    provider: Arc<dyn RideProvider>,
}

impl EstimateFareHandler {
    pub fn new(catalog: ProductCatalog, provider: Arc<dyn RideProvider>) -> Self {
        Self { catalog, provider }
    }

    pub async fn handle(&self, cmd: EstimateFareCommand) -> Result<StageOutcome, FulfillmentError> {
        // 1. Inputs written by earlier turns
        let product_name = cmd.context.require_product_name()?.to_string();
        let route = cmd.context.route()?;

        // 2. Seats only matter for shared rides
        let pooled_seats = if is_pooled(&product_name) {
            Some(parse_seat_count(cmd.seat_count.as_ref())?)
        } else {
            None
        };

        // 3. Product id at pickup; an unmatched name is left for the provider to reject
        let product_id = self
            .catalog
            .resolve_product_id(&product_name, route.start())
            .await?;
        if product_id.is_empty() {
            warn!(product = %product_name, "No product matches the requested name");
        }

        // 4. Quote
        let request = FareEstimateRequest::new(
            product_id.clone(),
            route,
            pooled_seats.unwrap_or(SeatCount::DEFAULT),
        );
        let quote = self
            .provider
            .estimate_fare(&request, &cmd.access_token)
            .await?;

        info!(
            product = %product_name,
            product_id = %product_id,
            fare_id = %quote.fare_id,
            seats = %request.seat_count,
            "Fare estimated"
        );

        // 5. Record product and quote
        let reply = Reply::fare_quote(&product_name, &quote);
        let context = cmd
            .context
            .with_quote(product_id, quote.fare_id.clone(), pooled_seats);
        Ok(StageOutcome::new(reply, context))
    }
}

fn parse_seat_count(value: Option<&Value>) -> Result<SeatCount, FulfillmentError> {
    let value = value.ok_or_else(|| {
        FulfillmentError::invalid_argument(keys::SEAT_COUNT, "required for pooled rides")
    })?;
    SeatCount::from_parameter(value)
        .map_err(|e| FulfillmentError::invalid_argument(keys::SEAT_COUNT, e.to_string()))
}
