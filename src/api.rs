//! Remote API contracts.
//!
//! [`ApiClient`](crate::client::ApiClient) implements all of them over HTTP;
//! the reconciliation logic only depends on these traits.

use std::future::Future;

use serde::Serialize;

use crate::auth::SignupRequest;
use crate::error::Error;
use crate::models::{CartLine, College, FavoriteItem, LoginResponse, User, Vendor, VendorListing};
use crate::types::{ItemId, Token, UniId, UserId, VendorId};

/// Identifies a cart line in mutation requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemRef {
    pub item_id: ItemId,
    pub kind: String,
    pub vendor_id: VendorId,
}

/// Body returned by OTP verification.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[non_exhaustive]
pub struct OtpResponse {
    #[serde(default)]
    pub token: Option<Token>,
}

/// Account, session and password-recovery endpoints.
pub trait AuthApi: Send + Sync + 'static {
    fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> impl Future<Output = Result<LoginResponse, Error>> + Send;

    fn current_user(&self, token: &Token) -> impl Future<Output = Result<User, Error>> + Send;

    fn logout(&self, token: &Token) -> impl Future<Output = Result<(), Error>> + Send;

    fn forgot_password(&self, identifier: &str) -> impl Future<Output = Result<(), Error>> + Send;

    fn verify_otp(
        &self,
        email: &str,
        otp: &str,
    ) -> impl Future<Output = Result<OtpResponse, Error>> + Send;

    fn reset_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    fn signup(
        &self,
        request: &SignupRequest<'_>,
    ) -> impl Future<Output = Result<LoginResponse, Error>> + Send;
}

/// The remote cart. It owns quantities, stock caps and per-item limits.
pub trait CartApi: Send + Sync + 'static {
    /// Full authoritative cart for `user`.
    fn fetch_cart(
        &self,
        token: &Token,
        user: &UserId,
    ) -> impl Future<Output = Result<Vec<CartLine>, Error>> + Send;

    /// Add a new line with an explicit quantity.
    fn add_item(
        &self,
        token: &Token,
        user: &UserId,
        item: &CartItemRef,
        quantity: u32,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Increment an existing line by one.
    fn add_one(
        &self,
        token: &Token,
        user: &UserId,
        item: &CartItemRef,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Decrement a line by one; the backend drops it at zero.
    fn remove_one(
        &self,
        token: &Token,
        user: &UserId,
        item: &CartItemRef,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    fn clear_cart(
        &self,
        token: &Token,
        user: &UserId,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Colleges, vendor directories and per-item inventory.
pub trait CatalogApi: Send + Sync + 'static {
    fn vendors_for_item(
        &self,
        token: &Token,
        item: &ItemId,
    ) -> impl Future<Output = Result<Vec<VendorListing>, Error>> + Send;

    fn vendors_for_university(
        &self,
        token: &Token,
        uni: &UniId,
    ) -> impl Future<Output = Result<Vec<Vendor>, Error>> + Send;

    fn colleges(&self, token: &Token) -> impl Future<Output = Result<Vec<College>, Error>> + Send;
}

pub trait FavoritesApi: Send + Sync + 'static {
    /// Favorites of `user`, optionally narrowed to one college.
    fn favorites(
        &self,
        token: &Token,
        user: &UserId,
        uni: Option<&UniId>,
    ) -> impl Future<Output = Result<Vec<FavoriteItem>, Error>> + Send;
}
