//! Ride products offered by the provider at a location.

use crate::domain::foundation::ProductId;

/// Label identifying shared (pooled) ride products.
pub const POOLED_PRODUCT_LABEL: &str = "pool";

/// A ride product (service tier) as listed by the provider.
///
/// Products are scoped to the location they were queried for and are never
/// cached; the catalog is re-fetched whenever it is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    display_name: String,
}

impl Product {
    pub fn new(id: ProductId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Case-insensitive comparison against a rider-supplied product name.
    pub fn matches_name(&self, name: &str) -> bool {
        self.display_name.to_lowercase() == name.to_lowercase()
    }
}

/// Returns true when the product name denotes a shared ride.
///
/// Matching is case-insensitive and accepts branded names such as
/// `uberPOOL` as well as the bare label.
pub fn is_pooled(product_name: &str) -> bool {
    product_name.to_lowercase().contains(POOLED_PRODUCT_LABEL)
}
