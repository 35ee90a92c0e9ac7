//! In-process backend double shared by unit tests.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::api::{AuthApi, CartApi, CartItemRef, CatalogApi, FavoritesApi, OtpResponse};
use crate::auth::SignupRequest;
use crate::error::Error;
use crate::models::{
    CartLine, College, FavoriteItem, Inventory, LoginResponse, User, Vendor, VendorListing,
};
use crate::types::{ItemId, Token, UniId, UserId, VendorId};

pub(crate) const VALID_OTP: &str = "424242";

#[derive(Default)]
struct State {
    calls: HashMap<&'static str, usize>,
    failures: HashMap<&'static str, Error>,
    cart: Vec<CartLine>,
    listings: HashMap<ItemId, Vec<VendorListing>>,
    accounts: HashMap<String, (String, Token)>,
    users: HashMap<String, User>,
    otp_token: Option<Token>,
    favorites: Vec<FavoriteItem>,
    colleges: Vec<College>,
    directory: HashMap<UniId, Vec<Vendor>>,
    signups: Vec<serde_json::Value>,
    logged_out: Vec<Token>,
}

/// Behaves like the canteen backend: the cart lives here and every mutation
/// is applied server-side.
#[derive(Default)]
pub(crate) struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn calls(&self, op: &str) -> usize {
        self.state.lock().calls.get(op).copied().unwrap_or(0)
    }

    /// Number of cart-changing requests received.
    pub(crate) fn mutation_calls(&self) -> usize {
        ["add_item", "add_one", "remove_one", "clear_cart"]
            .iter()
            .map(|op| self.calls(op))
            .sum()
    }

    /// Make the next call to `op` fail with `error`.
    pub(crate) fn fail_next(&self, op: &'static str, error: Error) {
        self.state.lock().failures.insert(op, error);
    }

    pub(crate) fn set_inventory(&self, item: &str, vendor: &str, inventory: Inventory) {
        self.set_listing(item, VendorListing::new(vendor.into(), Some(inventory)));
    }

    pub(crate) fn set_listing(&self, item: &str, listing: VendorListing) {
        let mut state = self.state.lock();
        let listings = state.listings.entry(item.into()).or_default();
        listings.retain(|l| l.id != listing.id);
        listings.push(listing);
    }

    /// Server-side cart, as another device would change it.
    pub(crate) fn set_cart(&self, lines: Vec<CartLine>) {
        self.state.lock().cart = lines;
    }

    pub(crate) fn cart(&self) -> Vec<CartLine> {
        self.state.lock().cart.clone()
    }

    pub(crate) fn add_account(&self, identifier: &str, password: &str, token: &str, user: User) {
        let mut state = self.state.lock();
        state
            .accounts
            .insert(identifier.to_owned(), (password.to_owned(), Token::from(token)));
        state.users.insert(token.to_owned(), user);
    }

    pub(crate) fn set_otp_token(&self, token: Option<&str>) {
        self.state.lock().otp_token = token.map(Token::from);
    }

    pub(crate) fn set_favorites(&self, favorites: Vec<FavoriteItem>) {
        self.state.lock().favorites = favorites;
    }

    pub(crate) fn set_college(&self, college: College, vendors: Vec<Vendor>) {
        let mut state = self.state.lock();
        state.directory.insert(college.id.clone(), vendors);
        state.colleges.push(college);
    }

    pub(crate) fn signups(&self) -> Vec<serde_json::Value> {
        self.state.lock().signups.clone()
    }

    pub(crate) fn logged_out(&self) -> Vec<Token> {
        self.state.lock().logged_out.clone()
    }

    fn enter(&self, op: &'static str) -> Result<(), Error> {
        let mut state = self.state.lock();
        *state.calls.entry(op).or_default() += 1;
        match state.failures.remove(op) {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl AuthApi for FakeBackend {
    async fn login(&self, identifier: &str, password: &str) -> Result<LoginResponse, Error> {
        self.enter("login")?;
        let state = self.state.lock();
        match state.accounts.get(identifier) {
            Some((expected, token)) if expected == password => {
                Ok(LoginResponse::with_token(token.clone()))
            }
            _ => Err(Error::api("login", 401, "Invalid credentials")),
        }
    }

    async fn current_user(&self, token: &Token) -> Result<User, Error> {
        self.enter("current_user")?;
        self.state
            .lock()
            .users
            .get(token.as_str())
            .cloned()
            .ok_or_else(|| Error::api("user lookup", 403, "Invalid token"))
    }

    async fn logout(&self, token: &Token) -> Result<(), Error> {
        self.enter("logout")?;
        self.state.lock().logged_out.push(token.clone());
        Ok(())
    }

    async fn forgot_password(&self, identifier: &str) -> Result<(), Error> {
        self.enter("forgot_password")?;
        if self.state.lock().accounts.contains_key(identifier) {
            Ok(())
        } else {
            Err(Error::api("forgot password", 404, "User not found"))
        }
    }

    async fn verify_otp(&self, _email: &str, otp: &str) -> Result<OtpResponse, Error> {
        self.enter("verify_otp")?;
        if otp != VALID_OTP {
            return Err(Error::api("otp verification", 400, "Invalid OTP"));
        }
        Ok(OtpResponse {
            token: self.state.lock().otp_token.clone(),
        })
    }

    async fn reset_password(&self, _email: &str, _password: &str) -> Result<(), Error> {
        self.enter("reset_password")
    }

    async fn signup(&self, request: &SignupRequest<'_>) -> Result<LoginResponse, Error> {
        self.enter("signup")?;
        let body = serde_json::to_value(request).map_err(|e| Error::Config(e.to_string()))?;
        self.state.lock().signups.push(body);
        Ok(LoginResponse::with_token(Token::from("signup-token")))
    }
}

impl CartApi for FakeBackend {
    async fn fetch_cart(&self, _token: &Token, _user: &UserId) -> Result<Vec<CartLine>, Error> {
        self.enter("fetch_cart")?;
        Ok(self.cart())
    }

    async fn add_item(
        &self,
        _token: &Token,
        _user: &UserId,
        item: &CartItemRef,
        quantity: u32,
    ) -> Result<(), Error> {
        self.enter("add_item")?;
        let mut state = self.state.lock();
        match state
            .cart
            .iter()
            .position(|l| l.item_id == item.item_id && l.vendor_id == item.vendor_id)
        {
            Some(pos) => state.cart[pos].quantity += quantity,
            None => state.cart.push(CartLine::new(
                item.item_id.clone(),
                item.kind.clone(),
                quantity,
                item.vendor_id.clone(),
            )),
        }
        Ok(())
    }

    async fn add_one(&self, _token: &Token, _user: &UserId, item: &CartItemRef) -> Result<(), Error> {
        self.enter("add_one")?;
        let mut state = self.state.lock();
        let line = state
            .cart
            .iter_mut()
            .find(|l| l.item_id == item.item_id && l.vendor_id == item.vendor_id)
            .ok_or_else(|| Error::api("increase quantity", 404, "Item not in cart"))?;
        line.quantity += 1;
        Ok(())
    }

    async fn remove_one(
        &self,
        _token: &Token,
        _user: &UserId,
        item: &CartItemRef,
    ) -> Result<(), Error> {
        self.enter("remove_one")?;
        let mut state = self.state.lock();
        let pos = state
            .cart
            .iter()
            .position(|l| l.item_id == item.item_id && l.vendor_id == item.vendor_id)
            .ok_or_else(|| Error::api("decrease quantity", 404, "Item not in cart"))?;
        if state.cart[pos].quantity <= 1 {
            state.cart.remove(pos);
        } else {
            state.cart[pos].quantity -= 1;
        }
        Ok(())
    }

    async fn clear_cart(&self, _token: &Token, _user: &UserId) -> Result<(), Error> {
        self.enter("clear_cart")?;
        self.state.lock().cart.clear();
        Ok(())
    }
}

impl CatalogApi for FakeBackend {
    async fn vendors_for_item(&self, _token: &Token, item: &ItemId) -> Result<Vec<VendorListing>, Error> {
        self.enter("vendors_for_item")?;
        Ok(self.state.lock().listings.get(item).cloned().unwrap_or_default())
    }

    async fn vendors_for_university(&self, _token: &Token, uni: &UniId) -> Result<Vec<Vendor>, Error> {
        self.enter("vendors_for_university")?;
        Ok(self.state.lock().directory.get(uni).cloned().unwrap_or_default())
    }

    async fn colleges(&self, _token: &Token) -> Result<Vec<College>, Error> {
        self.enter("colleges")?;
        Ok(self.state.lock().colleges.clone())
    }
}

impl FavoritesApi for FakeBackend {
    async fn favorites(
        &self,
        _token: &Token,
        _user: &UserId,
        uni: Option<&UniId>,
    ) -> Result<Vec<FavoriteItem>, Error> {
        self.enter("favorites")?;
        let state = self.state.lock();
        Ok(state
            .favorites
            .iter()
            .filter(|f| uni.is_none_or(|u| &f.uni_id == u))
            .cloned()
            .collect())
    }
}

/// Vendor id shorthand for tests.
pub(crate) fn vendor(id: &str) -> VendorId {
    VendorId::from(id)
}
