use crate::error::Error;
use crate::route::Route;

use super::signup::SignupError;

/// Why a session flow did not complete.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AuthError {
    /// No session, or the backend rejected it. The stored token is gone.
    #[error("not authenticated")]
    Unauthenticated,

    /// Input was rejected before any request was sent.
    #[error("{0}")]
    Validation(&'static str),

    #[error(transparent)]
    Signup(#[from] SignupError),

    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Any other 4xx answer, with the backend's message.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The backend asked the client to continue elsewhere.
    #[error("redirected to {}", .0.path())]
    Redirect(Route),

    #[error("server error: {0}")]
    Server(String),

    /// A success answer without a session token.
    #[error("no session token received")]
    MissingToken,

    /// A fresh token could not be persisted.
    #[error("failed to store authentication token")]
    Storage,

    #[error("network failure: {0}")]
    Network(String),

    #[error(transparent)]
    Remote(Error),
}

impl AuthError {
    /// Message suitable for showing next to the form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthenticated => "Please log in again.".to_owned(),
            Self::Validation(message) => (*message).to_owned(),
            Self::Signup(e) => e.to_string(),
            Self::InvalidCredentials(message) | Self::Rejected(message)
                if !message.is_empty() =>
            {
                message.clone()
            }
            Self::InvalidCredentials(_) => "Invalid credentials".to_owned(),
            Self::Server(_) => "Server error. Please try again later.".to_owned(),
            Self::Storage => "Failed to save login information. Please try again.".to_owned(),
            Self::Network(_) => "Unable to reach the server. Check your connection.".to_owned(),
            Self::Redirect(_) | Self::MissingToken | Self::Rejected(_) | Self::Remote(_) => {
                "Something went wrong. Please try again.".to_owned()
            }
        }
    }
}

impl From<Error> for AuthError {
    fn from(e: Error) -> Self {
        if e.is_transport() {
            return Self::Network(e.to_string());
        }
        match e {
            Error::Api {
                redirect_to: Some(path),
                ..
            } => Self::Redirect(Route::External(path)),
            Error::Api {
                status: 401,
                message,
                ..
            } => Self::InvalidCredentials(message),
            Error::Api {
                status: 500..,
                message,
                ..
            } => Self::Server(message),
            Error::Api { message, .. } => Self::Rejected(message),
            other => Self::Remote(other),
        }
    }
}
