//! ProductCatalog - product lookups against the ride provider.
//!
//! The catalog is never cached: products depend on location and time of
//! day, so every lookup goes back to the provider.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::{Coordinates, ProductId};
use crate::domain::trip::Product;
use crate::ports::{ProviderError, RideProvider};

/// Product queries scoped to a location.
#[derive(Clone)]
pub struct ProductCatalog {
    provider: Arc<dyn RideProvider>,
}

impl ProductCatalog {
    pub fn new(provider: Arc<dyn RideProvider>) -> Self {
        Self { provider }
    }

    /// Products available at a location, in provider order.
    pub async fn list_products(&self, location: Coordinates) -> Result<Vec<Product>, ProviderError> {
        let products = self.provider.list_products(location).await?;
        debug!(%location, count = products.len(), "Fetched product catalog");
        Ok(products)
    }

    /// Resolves a display name to the provider's product id.
    ///
    /// Matching is case-insensitive and the first match wins. When nothing
    /// matches the returned id is empty; the caller decides what to do.
    pub async fn resolve_product_id(
        &self,
        name: &str,
        location: Coordinates,
    ) -> Result<ProductId, ProviderError> {
        let products = self.list_products(location).await?;
        Ok(products
            .into_iter()
            .find(|product| product.matches_name(name))
            .map(|product| product.id().clone())
            .unwrap_or_else(ProductId::empty))
    }
}
