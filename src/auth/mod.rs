//! Session status and the account flows around it.
//!
//! A session exists exactly when the [`TokenStore`](crate::storage::TokenStore)
//! holds a token. It is created by login, signup or OTP verification, and
//! destroyed by logout or by the backend rejecting the token.

mod error;
mod session;
mod signup;

pub use error::AuthError;
pub use session::AuthSession;
pub use signup::{DEFAULT_USER_TYPE, Gender, SignupDraft, SignupError, SignupRequest};
