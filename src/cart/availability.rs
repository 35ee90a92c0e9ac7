use std::sync::Arc;

use crate::api::CatalogApi;
use crate::models::VendorListing;
use crate::storage::{KeyValueStore, TokenStore};
use crate::types::{ItemId, VendorId};

const PRODUCE: &[&str] = &[
    "combos-veg",
    "combos-nonveg",
    "veg",
    "shakes",
    "juices",
    "soups",
    "non-veg",
];

const RETAIL: &[&str] = &[
    "biscuits", "chips", "icecream", "drinks", "snacks", "sweets", "nescafe",
];

/// How an item's availability is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Made to order; availability is a `'Y'`/`'N'` flag.
    Produce,
    /// Pre-packed; availability is a stock count.
    Retail,
}

impl Category {
    /// Classify a menu category. Unknown categories have no class.
    #[must_use]
    pub fn classify(category: &str) -> Option<Self> {
        if PRODUCE.contains(&category) {
            Some(Self::Produce)
        } else if RETAIL.contains(&category) {
            Some(Self::Retail)
        } else {
            None
        }
    }

    /// Whether `listing` can serve an item of this class right now.
    #[must_use]
    pub fn is_available(self, listing: &VendorListing) -> bool {
        let Some(inventory) = &listing.inventory_value else {
            return false;
        };
        match self {
            Self::Retail => inventory.quantity().is_some_and(|q| q > 0.0),
            Self::Produce => inventory.is_available.as_deref() == Some("Y"),
        }
    }
}

/// Live availability lookups against the catalog.
///
/// Every check is fail-closed: unknown categories, missing vendors, missing
/// inventory and any request failure all read as "unavailable". Results are
/// never cached.
pub struct AvailabilityChecker<C, S> {
    catalog: Arc<C>,
    tokens: TokenStore<S>,
}

impl<C, S> Clone for AvailabilityChecker<C, S> {
    fn clone(&self) -> Self {
        Self {
            catalog: self.catalog.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

impl<C: CatalogApi, S: KeyValueStore> AvailabilityChecker<C, S> {
    #[must_use]
    pub fn new(catalog: Arc<C>, tokens: TokenStore<S>) -> Self {
        Self { catalog, tokens }
    }

    /// Whether `vendor` can currently serve `item` of menu `category`.
    pub async fn check(&self, vendor: &VendorId, item: &ItemId, category: &str) -> bool {
        let Some(class) = Category::classify(category) else {
            tracing::warn!(item_id = %item, category, "Unknown item category, treating as unavailable");
            return false;
        };

        let Some(token) = self.tokens.get().await else {
            tracing::warn!(item_id = %item, "No session token for availability check");
            return false;
        };

        let listings = match self.catalog.vendors_for_item(&token, item).await {
            Ok(listings) => listings,
            Err(e) => {
                tracing::warn!(error = %e, item_id = %item, "Availability check failed");
                return false;
            }
        };

        let available = listings
            .iter()
            .find(|listing| &listing.id == vendor)
            .is_some_and(|listing| class.is_available(listing));

        tracing::debug!(item_id = %item, vendor_id = %vendor, available, "Availability checked");
        available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Inventory;
    use crate::storage::MemoryStore;
    use crate::testing::FakeBackend;
    use crate::types::Token;

    async fn checker(backend: &Arc<FakeBackend>) -> AvailabilityChecker<FakeBackend, MemoryStore> {
        let tokens = TokenStore::new(MemoryStore::new());
        tokens.save(&Token::from("t")).await;
        AvailabilityChecker::new(backend.clone(), tokens)
    }

    #[test]
    fn classification_is_disjoint() {
        for c in PRODUCE {
            assert!(!RETAIL.contains(c));
            assert_eq!(Category::classify(c), Some(Category::Produce));
        }
        for c in RETAIL {
            assert_eq!(Category::classify(c), Some(Category::Retail));
        }
        assert_eq!(Category::classify("pizza"), None);
        assert_eq!(Category::classify("Chips"), None);
    }

    #[tokio::test]
    async fn retail_needs_positive_stock() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_inventory("x1", "v1", Inventory::stock(5));
        backend.set_inventory("x2", "v1", Inventory::stock(0));
        let checker = checker(&backend).await;

        assert!(checker.check(&"v1".into(), &"x1".into(), "chips").await);
        assert!(!checker.check(&"v1".into(), &"x2".into(), "chips").await);
    }

    #[tokio::test]
    async fn produce_needs_yes_flag() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_inventory("p1", "v1", Inventory::flag("Y"));
        backend.set_inventory("p2", "v1", Inventory::flag("N"));
        let checker = checker(&backend).await;

        assert!(checker.check(&"v1".into(), &"p1".into(), "veg").await);
        assert!(!checker.check(&"v1".into(), &"p2".into(), "veg").await);
    }

    #[tokio::test]
    async fn produce_ignores_stock_and_retail_ignores_flag() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_inventory("x1", "v1", Inventory::stock(9));
        backend.set_inventory("x2", "v1", Inventory::flag("Y"));
        let checker = checker(&backend).await;

        assert!(!checker.check(&"v1".into(), &"x1".into(), "shakes").await);
        assert!(!checker.check(&"v1".into(), &"x2".into(), "snacks").await);
    }

    #[tokio::test]
    async fn unknown_category_is_unavailable_without_lookup() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_inventory("x1", "v1", Inventory::stock(5));
        let checker = checker(&backend).await;

        assert!(!checker.check(&"v1".into(), &"x1".into(), "pizza").await);
        assert_eq!(backend.calls("vendors_for_item"), 0);
    }

    #[tokio::test]
    async fn missing_vendor_or_inventory_is_unavailable() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_listing("x1", VendorListing::new("v1".into(), None));
        let checker = checker(&backend).await;

        assert!(!checker.check(&"v1".into(), &"x1".into(), "chips").await);
        assert!(!checker.check(&"v2".into(), &"x1".into(), "chips").await);
    }

    #[tokio::test]
    async fn lookup_failure_is_unavailable() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_inventory("x1", "v1", Inventory::stock(5));
        backend.fail_next("vendors_for_item", crate::Error::api("item vendors", 500, "boom"));
        let checker = checker(&backend).await;

        assert!(!checker.check(&"v1".into(), &"x1".into(), "chips").await);
    }

    #[tokio::test]
    async fn no_token_is_unavailable() {
        let backend = Arc::new(FakeBackend::new());
        backend.set_inventory("x1", "v1", Inventory::stock(5));
        let checker = AvailabilityChecker::new(backend.clone(), TokenStore::new(MemoryStore::new()));

        assert!(!checker.check(&"v1".into(), &"x1".into(), "chips").await);
        assert_eq!(backend.calls("vendors_for_item"), 0);
    }
}
