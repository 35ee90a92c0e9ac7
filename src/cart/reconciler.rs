use std::sync::Arc;

use parking_lot::RwLock;

use super::availability::AvailabilityChecker;
use super::error::CartError;
use super::CartItem;
use crate::api::{CartApi, CatalogApi};
use crate::error::Error;
use crate::models::CartLine;
use crate::storage::{KeyValueStore, TokenStore};
use crate::types::{ItemId, Token, UserId, VendorId};

#[derive(Debug, Default)]
struct CartState {
    lines: Vec<CartLine>,
    current_vendor: Option<VendorId>,
}

/// Mirror of one user's remote cart plus the single-vendor rule.
///
/// All methods take `&self` so independent UI tasks can act concurrently.
/// The backend serialises the mutations; locally, whichever refetch completes
/// last wins. The state lock is never held across a request.
pub struct CartReconciler<A, S> {
    api: Arc<A>,
    tokens: TokenStore<S>,
    availability: AvailabilityChecker<A, S>,
    user: UserId,
    state: RwLock<CartState>,
}

impl<A: CartApi + CatalogApi, S: KeyValueStore> CartReconciler<A, S> {
    /// Create an empty, unbound view. Call [`refresh`](Self::refresh) to load
    /// the remote cart.
    #[must_use]
    pub fn new(api: Arc<A>, tokens: TokenStore<S>, user: UserId) -> Self {
        Self {
            availability: AvailabilityChecker::new(api.clone(), tokens.clone()),
            api,
            tokens,
            user,
            state: RwLock::new(CartState::default()),
        }
    }

    #[must_use]
    pub fn user(&self) -> &UserId {
        &self.user
    }

    /// Lines from the most recent refetch.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.state.read().lines.clone()
    }

    /// Vendor every line belongs to, or `None` for an unbound cart.
    #[must_use]
    pub fn current_vendor(&self) -> Option<VendorId> {
        self.state.read().current_vendor.clone()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.read().lines.is_empty()
    }

    /// Quantity of `item` from `vendor`, 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, item: &ItemId, vendor: &VendorId) -> u32 {
        self.state
            .read()
            .lines
            .iter()
            .find(|l| &l.item_id == item && &l.vendor_id == vendor)
            .map_or(0, |l| l.quantity)
    }

    /// Reload the remote cart and bind to the vendor of its first line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Unauthenticated`] if there is no session or the
    /// backend rejects it, otherwise the classified fetch failure.
    pub async fn refresh(&self) -> Result<(), CartError> {
        let token = self.token().await?;
        let lines = match self.api.fetch_cart(&token, &self.user).await {
            Ok(lines) => lines,
            Err(e) => return Err(self.fail(e).await),
        };

        let mut state = self.state.write();
        state.current_vendor = lines.first().map(|l| l.vendor_id.clone());
        state.lines = lines;
        tracing::debug!(user_id = %self.user, lines = state.lines.len(), "Cart refreshed");
        Ok(())
    }

    /// Put one unit of `item` in the cart.
    ///
    /// Rejected without any request when the cart is bound to another
    /// vendor, and without a cart mutation when the item is unavailable.
    ///
    /// # Errors
    ///
    /// [`CartError::VendorConflict`], [`CartError::ItemUnavailable`], or the
    /// classified backend failure.
    pub async fn add_item(&self, item: &CartItem) -> Result<(), CartError> {
        if let Some(current) = self.current_vendor().filter(|v| v != &item.vendor_id) {
            tracing::info!(
                current_vendor = %current,
                requested_vendor = %item.vendor_id,
                "Rejected item from another vendor"
            );
            return Err(CartError::VendorConflict {
                current,
                requested: item.vendor_id.clone(),
            });
        }

        let token = self.token().await?;
        self.ensure_available(item).await?;

        let reference = item.reference();
        let sent = if self.quantity_of(&item.item_id, &item.vendor_id) > 0 {
            self.api.add_one(&token, &self.user, &reference).await
        } else {
            self.api.add_item(&token, &self.user, &reference, 1).await
        };
        if let Err(e) = sent {
            return Err(self.fail(e).await);
        }

        self.resync_preferring(&token, Some(&item.vendor_id)).await?;
        tracing::info!(user_id = %self.user, item_id = %item.item_id, "Item added to cart");
        Ok(())
    }

    /// Add one more unit of an item already in the cart.
    ///
    /// # Errors
    ///
    /// [`CartError::ItemUnavailable`] or the classified backend failure, e.g.
    /// [`CartError::LimitedStock`].
    pub async fn increment(&self, item: &CartItem) -> Result<(), CartError> {
        let token = self.token().await?;
        self.ensure_available(item).await?;

        if let Err(e) = self.api.add_one(&token, &self.user, &item.reference()).await {
            return Err(self.fail(e).await);
        }
        self.resync(&token).await?;
        tracing::info!(user_id = %self.user, item_id = %item.item_id, "Cart quantity increased");
        Ok(())
    }

    /// Remove one unit; an emptied cart is unbound from its vendor.
    ///
    /// # Errors
    ///
    /// The classified backend failure.
    pub async fn decrement(&self, item: &CartItem) -> Result<(), CartError> {
        let token = self.token().await?;

        if let Err(e) = self.api.remove_one(&token, &self.user, &item.reference()).await {
            return Err(self.fail(e).await);
        }
        self.resync(&token).await?;
        tracing::info!(user_id = %self.user, item_id = %item.item_id, "Cart quantity decreased");
        Ok(())
    }

    /// Empty the remote cart and unbind the vendor.
    ///
    /// # Errors
    ///
    /// The classified backend failure; the local view is left untouched.
    pub async fn clear(&self) -> Result<(), CartError> {
        let token = self.token().await?;

        if let Err(e) = self.api.clear_cart(&token, &self.user).await {
            return Err(self.fail(e).await);
        }

        let mut state = self.state.write();
        state.lines.clear();
        state.current_vendor = None;
        tracing::info!(user_id = %self.user, "Cart cleared");
        Ok(())
    }

    async fn token(&self) -> Result<Token, CartError> {
        self.tokens.get().await.ok_or(CartError::Unauthenticated)
    }

    async fn ensure_available(&self, item: &CartItem) -> Result<(), CartError> {
        let available = self
            .availability
            .check(&item.vendor_id, &item.item_id, &item.category)
            .await;
        if available {
            Ok(())
        } else {
            Err(CartError::ItemUnavailable)
        }
    }

    /// Replace the local view with the remote cart.
    async fn resync(&self, token: &Token) -> Result<(), CartError> {
        self.resync_preferring(token, None).await
    }

    /// Replace the local view with the remote cart. An empty cart unbinds;
    /// an unbound view with lines binds to `preferred` if the cart holds
    /// it, else to the vendor of the first line.
    async fn resync_preferring(
        &self,
        token: &Token,
        preferred: Option<&VendorId>,
    ) -> Result<(), CartError> {
        let lines = match self.api.fetch_cart(token, &self.user).await {
            Ok(lines) => lines,
            Err(e) => return Err(self.fail(e).await),
        };

        let mut state = self.state.write();
        if lines.is_empty() {
            state.current_vendor = None;
        } else if state.current_vendor.is_none() {
            let bound = preferred
                .filter(|v| lines.iter().any(|l| &l.vendor_id == *v))
                .or_else(|| lines.first().map(|l| &l.vendor_id))
                .cloned();
            state.current_vendor = bound;
        }
        state.lines = lines;
        Ok(())
    }

    /// Classify a backend failure; a rejected session is torn down here.
    async fn fail(&self, e: Error) -> CartError {
        let err = CartError::from(e);
        if err == CartError::Unauthenticated {
            tracing::warn!(user_id = %self.user, "Session rejected by backend, removing token");
            self.tokens.remove().await;
        } else {
            tracing::warn!(user_id = %self.user, error = %err, "Cart operation failed");
        }
        err
    }
}
