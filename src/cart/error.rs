use crate::error::Error;
use crate::route::Route;
use crate::types::VendorId;

/// Why a cart action did not go through.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CartError {
    /// The cart is bound to another vendor. No request was sent.
    #[error("cart holds items from vendor {current}, cannot add from {requested}")]
    VendorConflict {
        current: VendorId,
        requested: VendorId,
    },

    /// The vendor cannot serve the item right now. No mutation was sent.
    #[error("item is currently unavailable")]
    ItemUnavailable,

    /// The backend's per-item cap was hit.
    #[error("maximum quantity reached")]
    QuantityLimitReached,

    /// Only this many units remain in stock.
    #[error("only {0} available")]
    LimitedStock(u32),

    /// The session token is missing or was rejected; it has been removed.
    #[error("not authenticated")]
    Unauthenticated,

    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("operation failed: {0}")]
    OperationFailed(String),
}

impl CartError {
    /// Where the caller must navigate after this error, if anywhere.
    #[must_use]
    pub fn redirect(&self) -> Option<Route> {
        matches!(self, Self::Unauthenticated).then_some(Route::Login)
    }

    /// Classify a backend rejection message.
    fn from_message(message: String) -> Self {
        if message.contains("max quantity") {
            return Self::QuantityLimitReached;
        }
        if let Some(available) = parse_only_count(&message) {
            return Self::LimitedStock(available);
        }
        Self::OperationFailed(message)
    }
}

/// Extract `n` from messages like `"Only 2 left in stock"`.
fn parse_only_count(message: &str) -> Option<u32> {
    let (_, rest) = message.split_once("Only ")?;
    let digits: String = rest
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

impl From<Error> for CartError {
    fn from(e: Error) -> Self {
        if e.is_unauthorized() {
            return Self::Unauthenticated;
        }
        if e.is_transport() {
            return Self::NetworkFailure(e.to_string());
        }
        match e {
            Error::Api { status, message, .. } if (400..500).contains(&status) => {
                Self::from_message(message)
            }
            Error::Api { message, .. } => Self::OperationFailed(message),
            other => Self::OperationFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_n_becomes_limited_stock() {
        let err = CartError::from(Error::api("increase quantity", 400, "Only 2 left in stock"));
        assert_eq!(err, CartError::LimitedStock(2));
    }

    #[test]
    fn only_without_count_is_generic() {
        let err = CartError::from(Error::api("add to cart", 400, "Only registered users"));
        assert_eq!(err, CartError::OperationFailed("Only registered users".into()));
    }

    #[test]
    fn max_quantity_is_limit() {
        let err = CartError::from(Error::api("add to cart", 400, "Reached max quantity for item"));
        assert_eq!(err, CartError::QuantityLimitReached);
    }

    #[test]
    fn rejected_token_is_unauthenticated() {
        assert_eq!(
            CartError::from(Error::api("cart fetch", 401, "jwt expired")),
            CartError::Unauthenticated
        );
        assert_eq!(
            CartError::from(Error::api("cart fetch", 403, "")),
            CartError::Unauthenticated
        );
        assert_eq!(CartError::Unauthenticated.redirect(), Some(Route::Login));
        assert_eq!(CartError::ItemUnavailable.redirect(), None);
    }

    #[test]
    fn server_errors_are_not_parsed() {
        let err = CartError::from(Error::api("add to cart", 500, "Only 3 workers alive"));
        assert_eq!(err, CartError::OperationFailed("Only 3 workers alive".into()));
    }
}
