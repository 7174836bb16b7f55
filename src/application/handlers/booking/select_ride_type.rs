//! SelectRideTypeHandler - first turn: route lookup and product prompt.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::Coordinates;
use crate::domain::trip::{FulfillmentError, Reply, Route, TripContext};
use crate::ports::GeoResolver;

use super::product_catalog::ProductCatalog;
use super::stage_outcome::StageOutcome;

/// Command to offer ride types between two addresses.
#[derive(Debug, Clone)]
pub struct SelectRideTypeCommand {
    pub source: String,
    pub destination: String,
    /// Inbound snapshot; empty on the first turn.
    pub context: TripContext,
}

/// Handler for ride type selection.
pub struct SelectRideTypeHandler {
    geo: Arc<dyn GeoResolver>,
    catalog: ProductCatalog,
}

impl SelectRideTypeHandler {
    pub fn new(geo: Arc<dyn GeoResolver>, catalog: ProductCatalog) -> Self {
        Self { geo, catalog }
    }

    pub async fn handle(&self, cmd: SelectRideTypeCommand) -> Result<StageOutcome, FulfillmentError> {
        // 1. Geocode both ends; the lookups are independent
        let (start, end) = tokio::try_join!(self.locate(&cmd.source), self.locate(&cmd.destination))?;

        // 2. Products at pickup
        let products = self.catalog.list_products(start).await?;
        if products.is_empty() {
            warn!(%start, "No products available at pickup");
        }

        info!(
            source = %cmd.source,
            destination = %cmd.destination,
            products = products.len(),
            "Offering ride types"
        );

        // 3. Only the coordinates change
        let context = cmd.context.with_route(Route::new(start, end));
        Ok(StageOutcome::new(Reply::ride_type_prompt(&products), context))
    }

    async fn locate(&self, address: &str) -> Result<Coordinates, FulfillmentError> {
        self.geo
            .resolve(address)
            .await
            .map_err(|e| FulfillmentError::resolution(address, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::geocoding::MockGeoResolver;
    use crate::adapters::ride::MockRideProvider;
    use crate::domain::foundation::{FareId, ProductId};
    use crate::ports::{GeoError, ProviderError};
    use proptest::prelude::*;

    fn handler(geo: MockGeoResolver, provider: MockRideProvider) -> SelectRideTypeHandler {
        SelectRideTypeHandler::new(
            Arc::new(geo),
            ProductCatalog::new(Arc::new(provider)),
        )
    }

    fn geo() -> MockGeoResolver {
        MockGeoResolver::new()
            .with_location("A", 1.0, 1.0)
            .with_location("B", 2.0, 2.0)
    }

    fn command(context: TripContext) -> SelectRideTypeCommand {
        SelectRideTypeCommand {
            source: "A".to_string(),
            destination: "B".to_string(),
            context,
        }
    }

    #[tokio::test]
    async fn writes_route_and_lists_products() {
        let provider = MockRideProvider::new()
            .with_product("p1", "uberX")
            .with_product("p2", "uberPool");

        let outcome = handler(geo(), provider)
            .handle(command(TripContext::default()))
            .await
            .unwrap();

        assert!(outcome.reply.speech.contains("uberX, uberPool"));
        assert!(outcome.reply.display_text.contains("uberX, uberPool"));
        assert_eq!(outcome.context.start_lat(), Some(1.0));
        assert_eq!(outcome.context.start_lng(), Some(1.0));
        assert_eq!(outcome.context.end_lat(), Some(2.0));
        assert_eq!(outcome.context.end_lng(), Some(2.0));
    }

    #[tokio::test]
    async fn queries_catalog_at_pickup() {
        let provider = MockRideProvider::new().with_product("p1", "uberX");
        let handler = SelectRideTypeHandler::new(
            Arc::new(geo()),
            ProductCatalog::new(Arc::new(provider.clone())),
        );

        handler.handle(command(TripContext::default())).await.unwrap();

        let queries = provider.calls().product_queries;
        assert_eq!(queries, vec![Coordinates::new(1.0, 1.0).unwrap()]);
    }

    #[tokio::test]
    async fn leaves_other_fields_untouched() {
        let prior = TripContext::default()
            .with_product_name("uberX")
            .with_quote(ProductId::new("p0"), FareId::new("f0").unwrap(), None);

        let outcome = handler(geo(), MockRideProvider::new().with_product("p1", "uberX"))
            .handle(command(prior.clone()))
            .await
            .unwrap();

        assert_eq!(outcome.context.product_name(), Some("uberX"));
        assert_eq!(outcome.context.product_id(), prior.product_id());
        assert_eq!(outcome.context.fare_id(), prior.fare_id());
    }

    #[tokio::test]
    async fn unresolved_destination_fails_with_resolution_error() {
        let geo = MockGeoResolver::new().with_location("A", 1.0, 1.0);

        let err = handler(geo, MockRideProvider::new())
            .handle(command(TripContext::default()))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            FulfillmentError::resolution("B", GeoError::no_match("B").to_string())
        );
    }

    #[tokio::test]
    async fn empty_catalog_still_succeeds() {
        let outcome = handler(geo(), MockRideProvider::new())
            .handle(command(TripContext::default()))
            .await
            .unwrap();

        assert!(outcome.reply.speech.contains("no Uber rides available"));
        assert_eq!(outcome.context.end_lat(), Some(2.0));
    }

    #[tokio::test]
    async fn catalog_failure_is_provider_error() {
        let provider =
            MockRideProvider::new().with_catalog_error(ProviderError::unavailable("down"));

        let err = handler(geo(), provider)
            .handle(command(TripContext::default()))
            .await
            .unwrap_err();

        assert_eq!(err, FulfillmentError::Provider(ProviderError::unavailable("down")));
    }

    proptest! {
        #[test]
        fn repeated_selection_yields_identical_coordinates(
            lat_a in -90.0f64..=90.0,
            lng_a in -180.0f64..=180.0,
            lat_b in -90.0f64..=90.0,
            lng_b in -180.0f64..=180.0,
        ) {
            let geo = MockGeoResolver::new()
                .with_location("A", lat_a, lng_a)
                .with_location("B", lat_b, lng_b);
            let handler = handler(geo, MockRideProvider::new().with_product("p1", "uberX"));
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

            let first = runtime.block_on(handler.handle(command(TripContext::default()))).unwrap();
            let second = runtime.block_on(handler.handle(command(first.context.clone()))).unwrap();

            prop_assert_eq!(first.context.route().unwrap(), second.context.route().unwrap());
            prop_assert_eq!(first.context.start_lat(), Some(lat_a));
            prop_assert_eq!(second.context.end_lng(), Some(lng_b));
        }
    }
}
