use reqwest::Method;
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{AuthApi, CartApi, CartItemRef, CatalogApi, FavoritesApi, OtpResponse};
use crate::auth::SignupRequest;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::models::{
    CartLine, CartResponse, College, FavoriteItem, LoginResponse, User, Vendor, VendorListing,
};
use crate::types::{ItemId, Token, UniId, UserId};

/// HTTP client for the canteen backend.
///
/// Stateless apart from the connection pool: credentials are passed per call
/// so every request reads the current token.
#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct AddItemBody<'a> {
    #[serde(flatten)]
    item: &'a CartItemRef,
    quantity: u32,
}

#[derive(serde::Deserialize)]
struct FavoritesBody {
    #[serde(default)]
    favourites: Vec<FavoriteItem>,
}

#[derive(serde::Deserialize)]
struct ContactReply {
    #[serde(default)]
    message: Option<String>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    redirect_to: Option<String>,
}

impl ApiClient {
    /// Create a client with a connection pool honouring the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the TLS backend cannot be initialised.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, http })
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Submit the help-page contact form. Returns the backend's reply text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, or [`Error::Api`] if the
    /// backend rejects the message.
    pub async fn send_contact_message(
        &self,
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<Option<String>, Error> {
        let body = serde_json::json!({ "name": name, "email": email, "message": message });
        let response = self
            .send(Method::POST, &["contact"], None, Some(&body), "contact")
            .await?;
        let reply = response.json::<ContactReply>().await?;
        Ok(reply.message)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Config(format!("backend URL cannot be a base: {}", self.config.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&Token>,
        body: Option<&B>,
        operation: &'static str,
    ) -> Result<reqwest::Response, Error> {
        let url = self.endpoint(segments)?;
        tracing::debug!(operation, %method, url = %url, "Backend request");

        let mut request = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(token) = token {
            request = request.bearer_auth(token.as_str());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        Self::ensure_success(response, operation).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        token: &Token,
        operation: &'static str,
    ) -> Result<T, Error> {
        let response = self
            .send::<()>(Method::GET, segments, Some(token), None, operation)
            .await?;
        response.json::<T>().await.map_err(Into::into)
    }

    /// Checks HTTP response status; returns the response on success or an error with details.
    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, Error> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let (message, redirect_to) = parse_error_body(&body);
        tracing::debug!(operation, status, message = %message, "Backend rejected request");
        Err(Error::Api {
            operation,
            status,
            message,
            redirect_to,
        })
    }
}

/// Extracts `message` / `redirectTo` from a JSON error body, falling back to raw text.
fn parse_error_body(body: &str) -> (String, Option<String>) {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => (parsed.message.unwrap_or_default(), parsed.redirect_to),
        Err(_) => (body.trim().to_owned(), None),
    }
}

impl AuthApi for ApiClient {
    async fn login(&self, identifier: &str, password: &str) -> Result<LoginResponse, Error> {
        let body = serde_json::json!({ "identifier": identifier, "password": password });
        let response = self
            .send(Method::POST, &["api", "user", "auth", "login"], None, Some(&body), "login")
            .await?;
        response.json::<LoginResponse>().await.map_err(Into::into)
    }

    async fn current_user(&self, token: &Token) -> Result<User, Error> {
        self.get_json(&["api", "user", "auth", "user"], token, "user lookup")
            .await
    }

    async fn logout(&self, token: &Token) -> Result<(), Error> {
        self.send::<()>(Method::POST, &["api", "user", "auth", "logout"], Some(token), None, "logout")
            .await?;
        Ok(())
    }

    async fn forgot_password(&self, identifier: &str) -> Result<(), Error> {
        let body = serde_json::json!({ "identifier": identifier });
        self.send(
            Method::POST,
            &["api", "user", "auth", "forgotpassword"],
            None,
            Some(&body),
            "forgot password",
        )
        .await?;
        Ok(())
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<OtpResponse, Error> {
        let body = serde_json::json!({ "email": email, "otp": otp });
        let response = self
            .send(
                Method::POST,
                &["api", "auth", "otpverification"],
                None,
                Some(&body),
                "otp verification",
            )
            .await?;
        response.json::<OtpResponse>().await.map_err(Into::into)
    }

    async fn reset_password(&self, email: &str, password: &str) -> Result<(), Error> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.send(
            Method::POST,
            &["api", "user", "auth", "resetpassword"],
            None,
            Some(&body),
            "reset password",
        )
        .await?;
        Ok(())
    }

    async fn signup(&self, request: &SignupRequest<'_>) -> Result<LoginResponse, Error> {
        let response = self
            .send(Method::POST, &["api", "user", "auth", "signup"], None, Some(request), "signup")
            .await?;
        response.json::<LoginResponse>().await.map_err(Into::into)
    }
}

impl CartApi for ApiClient {
    async fn fetch_cart(&self, token: &Token, user: &UserId) -> Result<Vec<CartLine>, Error> {
        let response: CartResponse = self
            .get_json(&["cart", user.as_str()], token, "cart fetch")
            .await?;
        Ok(response.into_lines())
    }

    async fn add_item(
        &self,
        token: &Token,
        user: &UserId,
        item: &CartItemRef,
        quantity: u32,
    ) -> Result<(), Error> {
        let body = AddItemBody { item, quantity };
        self.send(
            Method::POST,
            &["cart", "add", user.as_str()],
            Some(token),
            Some(&body),
            "add to cart",
        )
        .await?;
        Ok(())
    }

    async fn add_one(&self, token: &Token, user: &UserId, item: &CartItemRef) -> Result<(), Error> {
        self.send(
            Method::POST,
            &["cart", "add-one", user.as_str()],
            Some(token),
            Some(item),
            "increase quantity",
        )
        .await?;
        Ok(())
    }

    async fn remove_one(
        &self,
        token: &Token,
        user: &UserId,
        item: &CartItemRef,
    ) -> Result<(), Error> {
        self.send(
            Method::POST,
            &["cart", "remove-one", user.as_str()],
            Some(token),
            Some(item),
            "decrease quantity",
        )
        .await?;
        Ok(())
    }

    async fn clear_cart(&self, token: &Token, user: &UserId) -> Result<(), Error> {
        let body = serde_json::json!({});
        self.send(
            Method::POST,
            &["cart", "clear", user.as_str()],
            Some(token),
            Some(&body),
            "clear cart",
        )
        .await?;
        Ok(())
    }
}

impl CatalogApi for ApiClient {
    async fn vendors_for_item(&self, token: &Token, item: &ItemId) -> Result<Vec<VendorListing>, Error> {
        self.get_json(&["items", "vendors", item.as_str()], token, "item vendors")
            .await
    }

    async fn vendors_for_university(&self, token: &Token, uni: &UniId) -> Result<Vec<Vendor>, Error> {
        self.get_json(&["api", "vendor", "list", "uni", uni.as_str()], token, "vendor directory")
            .await
    }

    async fn colleges(&self, token: &Token) -> Result<Vec<College>, Error> {
        self.get_json(&["api", "user", "auth", "list"], token, "college list")
            .await
    }
}

impl FavoritesApi for ApiClient {
    async fn favorites(
        &self,
        token: &Token,
        user: &UserId,
        uni: Option<&UniId>,
    ) -> Result<Vec<FavoriteItem>, Error> {
        let body: FavoritesBody = match uni {
            Some(uni) => {
                self.get_json(&["fav", user.as_str(), uni.as_str()], token, "favorites")
                    .await?
            }
            None => self.get_json(&["fav", user.as_str()], token, "favorites").await?,
        };
        Ok(body.favourites)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> ApiClient {
        let config = ClientConfig::new("https://api.example.com/base".parse().unwrap()).unwrap();
        ApiClient::new(config).unwrap()
    }

    #[test]
    fn endpoint_appends_segments() {
        let client = test_client();
        let url = client.endpoint(&["cart", "add-one", "u1"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/base/cart/add-one/u1");
    }

    #[test]
    fn endpoint_escapes_identifiers() {
        let client = test_client();
        let url = client.endpoint(&["fav", "u 1/x"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/base/fav/u%201%2Fx");
    }

    #[test]
    fn error_body_json_message() {
        let (message, redirect) =
            parse_error_body(r#"{"message": "Only 2 left in stock", "redirectTo": "/signup"}"#);
        assert_eq!(message, "Only 2 left in stock");
        assert_eq!(redirect.as_deref(), Some("/signup"));
    }

    #[test]
    fn error_body_plain_text() {
        let (message, redirect) = parse_error_body("  Bad Gateway \n");
        assert_eq!(message, "Bad Gateway");
        assert!(redirect.is_none());
    }

    #[test]
    fn add_item_body_is_flat() {
        let item = CartItemRef {
            item_id: ItemId::from("x1"),
            kind: "Retail".into(),
            vendor_id: "v1".into(),
        };
        let json = serde_json::to_value(AddItemBody { item: &item, quantity: 1 }).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "itemId": "x1", "kind": "Retail", "vendorId": "v1", "quantity": 1 })
        );
    }
}
