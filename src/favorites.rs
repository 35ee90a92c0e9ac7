//! The favorites screen: favorited items, who sells them, and how many of
//! each are in the cart.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::api::{CartApi, CatalogApi, FavoritesApi};
use crate::cart::{CartError, CartItem, CartReconciler};
use crate::models::{FavoriteItem, Vendor};
use crate::notify::{CartAction, Notification, Notifier};
use crate::route::Route;
use crate::storage::{KeyValueStore, TokenStore};
use crate::types::{Token, UniId, UserId, VendorId};

/// Shown when a vendor is missing from the directory.
pub const UNKNOWN_VENDOR: &str = "Unknown Vendor";

#[derive(Debug, Default)]
struct Loaded {
    favorites: Vec<FavoriteItem>,
    vendor_names: HashMap<VendorId, String>,
}

/// Read-only favorites list wired to a [`CartReconciler`].
///
/// Cart actions never fail towards the caller: every outcome is reported
/// through the [`Notifier`], and the only thing returned is where to go next
/// when the session turned out to be gone.
pub struct FavoritesView<A, S, N> {
    api: Arc<A>,
    tokens: TokenStore<S>,
    cart: CartReconciler<A, S>,
    notifier: N,
    loaded: RwLock<Loaded>,
}

impl<A, S, N> FavoritesView<A, S, N>
where
    A: FavoritesApi + CatalogApi + CartApi,
    S: KeyValueStore,
    N: Notifier,
{
    #[must_use]
    pub fn new(api: Arc<A>, tokens: TokenStore<S>, user: UserId, notifier: N) -> Self {
        Self {
            cart: CartReconciler::new(api.clone(), tokens.clone(), user),
            api,
            tokens,
            notifier,
            loaded: RwLock::new(Loaded::default()),
        }
    }

    #[must_use]
    pub fn cart(&self) -> &CartReconciler<A, S> {
        &self.cart
    }

    /// Load favorites, the vendor directory and the cart.
    ///
    /// With a `college` both favorites and directory are narrowed to it;
    /// otherwise the directory is the union over every college. Directory
    /// failures are logged and leave names as [`UNKNOWN_VENDOR`].
    ///
    /// # Errors
    ///
    /// The classified failure of the favorites or cart request.
    /// [`CartError::Unauthenticated`] means the token has been removed.
    pub async fn load(&self, college: Option<&UniId>) -> Result<(), CartError> {
        let token = self.tokens.get().await.ok_or(CartError::Unauthenticated)?;

        let favorites = match self.api.favorites(&token, self.cart.user(), college).await {
            Ok(favorites) => favorites,
            Err(e) => {
                let err = CartError::from(e);
                if err == CartError::Unauthenticated {
                    tracing::warn!("Session rejected while loading favorites, removing token");
                    self.tokens.remove().await;
                }
                return Err(err);
            }
        };
        let vendor_names = self.vendor_directory(&token, college).await;

        {
            let mut loaded = self.loaded.write();
            tracing::info!(
                favorites = favorites.len(),
                vendors = vendor_names.len(),
                "Favorites loaded"
            );
            loaded.favorites = favorites;
            loaded.vendor_names = vendor_names;
        }

        self.cart.refresh().await
    }

    async fn vendor_directory(
        &self,
        token: &Token,
        college: Option<&UniId>,
    ) -> HashMap<VendorId, String> {
        let unis = match college {
            Some(uni) => vec![uni.clone()],
            None => match self.api.colleges(token).await {
                Ok(colleges) => colleges.into_iter().map(|c| c.id).collect(),
                Err(e) => {
                    tracing::warn!(error = %e, "Fetching college list failed");
                    return HashMap::new();
                }
            },
        };

        let mut names = HashMap::new();
        for uni in &unis {
            match self.api.vendors_for_university(token, uni).await {
                Ok(vendors) => merge_vendors(&mut names, vendors),
                Err(e) => tracing::warn!(error = %e, uni_id = %uni, "Fetching vendors failed"),
            }
        }
        names
    }

    #[must_use]
    pub fn favorites(&self) -> Vec<FavoriteItem> {
        self.loaded.read().favorites.clone()
    }

    /// Directory name of `vendor`, or [`UNKNOWN_VENDOR`].
    #[must_use]
    pub fn vendor_name(&self, vendor: &VendorId) -> String {
        self.loaded
            .read()
            .vendor_names
            .get(vendor)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_VENDOR.to_owned())
    }

    /// Units of `item` currently in the cart.
    #[must_use]
    pub fn quantity(&self, item: &FavoriteItem) -> u32 {
        self.cart.quantity_of(&item.id, &item.vendor_id)
    }

    pub async fn add_to_cart(&self, item: &FavoriteItem) -> Option<Route> {
        let result = self.cart.add_item(&CartItem::from(item)).await;
        self.report(CartAction::Add, &item.name, result)
    }

    pub async fn increase(&self, item: &FavoriteItem) -> Option<Route> {
        let result = self.cart.increment(&CartItem::from(item)).await;
        self.report(CartAction::Increase, &item.name, result)
    }

    pub async fn decrease(&self, item: &FavoriteItem) -> Option<Route> {
        let result = self.cart.decrement(&CartItem::from(item)).await;
        self.report(CartAction::Decrease, &item.name, result)
    }

    pub async fn clear_cart(&self) -> Option<Route> {
        let result = self.cart.clear().await;
        self.report(CartAction::Clear, "", result)
    }

    fn report(
        &self,
        action: CartAction,
        item_name: &str,
        result: Result<(), CartError>,
    ) -> Option<Route> {
        match result {
            Ok(()) => {
                self.notifier
                    .notify(Notification::for_cart_success(action, item_name));
                None
            }
            Err(e) => {
                self.notifier
                    .notify(Notification::for_cart_error(&e, action, item_name));
                e.redirect()
            }
        }
    }
}

/// Add `vendors` to `names`; a vendor already present keeps its name.
fn merge_vendors(names: &mut HashMap<VendorId, String>, vendors: Vec<Vendor>) {
    for vendor in vendors {
        names.entry(vendor.id).or_insert(vendor.name);
    }
}
