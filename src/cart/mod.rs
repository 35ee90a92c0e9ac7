//! Local cart view kept in sync with the remote cart.
//!
//! The remote cart owns every quantity: stock, per-item caps and changes made
//! from other devices are only visible there. The [`CartReconciler`]
//! therefore never computes a quantity itself; each mutation ends with a full
//! refetch that replaces the local view.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use canteen_client::{ApiClient, CartItem, CartReconciler, ClientConfig, FileStore, TokenStore};
//!
//! let api = Arc::new(ApiClient::new(ClientConfig::from_env()?)?);
//! let tokens = TokenStore::new(FileStore::new("session.json"));
//! let cart = CartReconciler::new(api, tokens, user.id.clone());
//!
//! cart.refresh().await?;
//! cart.add_item(&CartItem::from(&favorite)).await?;
//! ```

mod availability;
mod error;
mod reconciler;

pub use availability::{AvailabilityChecker, Category};
pub use error::CartError;
pub use reconciler::CartReconciler;

use crate::api::CartItemRef;
use crate::models::FavoriteItem;
use crate::types::{ItemId, VendorId};

/// An item the user wants in (or out of) the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub item_id: ItemId,
    pub vendor_id: VendorId,
    /// Menu category, decides which availability rule applies.
    pub category: String,
    /// Cart kind tag sent to the backend.
    pub kind: String,
}

impl CartItem {
    #[must_use]
    pub fn new(
        item_id: ItemId,
        vendor_id: VendorId,
        category: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            item_id,
            vendor_id,
            category: category.into(),
            kind: kind.into(),
        }
    }

    pub(crate) fn reference(&self) -> CartItemRef {
        CartItemRef {
            item_id: self.item_id.clone(),
            kind: self.kind.clone(),
            vendor_id: self.vendor_id.clone(),
        }
    }
}

impl From<&FavoriteItem> for CartItem {
    fn from(item: &FavoriteItem) -> Self {
        Self::new(
            item.id.clone(),
            item.vendor_id.clone(),
            item.category.clone(),
            item.kind.clone(),
        )
    }
}
