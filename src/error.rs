/// Transport and protocol errors from the canteen backend.
///
/// Component errors ([`CartError`](crate::cart::CartError),
/// [`AuthError`](crate::auth::AuthError)) are classified from this type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("{operation} failed with status {status}: {message}")]
    Api {
        operation: &'static str,
        status: u16,
        message: String,
        redirect_to: Option<String>,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build an [`Error::Api`] without a redirect hint.
    #[must_use]
    pub fn api(operation: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            operation,
            status,
            message: message.into(),
            redirect_to: None,
        }
    }

    /// HTTP status of a backend rejection, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            #[cfg(feature = "http")]
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Config(_) => None,
        }
    }

    /// Whether the backend refused the bearer token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Whether the request never produced a usable response.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        match self {
            #[cfg(feature = "http")]
            Self::Http(e) => !e.is_decode() && e.status().is_none(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_statuses() {
        assert!(Error::api("cart", 401, "").is_unauthorized());
        assert!(Error::api("cart", 403, "").is_unauthorized());
        assert!(!Error::api("cart", 400, "").is_unauthorized());
        assert!(!Error::Config("x".into()).is_unauthorized());
    }

    #[test]
    fn api_error_display() {
        let e = Error::api("add to cart", 400, "Only 2 left");
        assert_eq!(e.to_string(), "add to cart failed with status 400: Only 2 left");
        assert!(!e.is_transport());
    }
}
