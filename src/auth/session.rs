use std::sync::Arc;

use super::error::AuthError;
use super::signup::SignupDraft;
use crate::api::AuthApi;
use crate::models::User;
use crate::route::{OtpPurpose, Route};
use crate::storage::{KeyValueStore, TokenStore};
use crate::types::Token;

/// Session state derived from the [`TokenStore`], plus the account flows
/// that create or destroy it.
///
/// Flows return the [`Route`] the app should show next.
pub struct AuthSession<A, S> {
    api: Arc<A>,
    tokens: TokenStore<S>,
}

// Manual Clone: avoid derive adding `A: Clone, S: Clone` bounds.
impl<A, S> Clone for AuthSession<A, S> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

impl<A: AuthApi, S: KeyValueStore> AuthSession<A, S> {
    #[must_use]
    pub fn new(api: Arc<A>, tokens: TokenStore<S>) -> Self {
        Self { api, tokens }
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenStore<S> {
        &self.tokens
    }

    /// Whether a session token is stored. Does not contact the backend.
    pub async fn is_authenticated(&self) -> bool {
        self.tokens.get().await.is_some()
    }

    /// Fetch the signed-in user.
    ///
    /// # Errors
    ///
    /// [`AuthError::Unauthenticated`] without a request when no token is
    /// stored, or after removing the token when the backend rejects it.
    pub async fn current_user(&self) -> Result<User, AuthError> {
        let token = self.tokens.get().await.ok_or(AuthError::Unauthenticated)?;

        match self.api.current_user(&token).await {
            Ok(user) => Ok(user),
            Err(e) if e.is_unauthorized() => {
                tracing::warn!(error = %e, "Session rejected by backend, removing token");
                self.tokens.remove().await;
                Err(AuthError::Unauthenticated)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Sign in with an email or phone number.
    ///
    /// Any stored token is removed when the attempt fails.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] for empty fields (no request is sent),
    /// [`AuthError::MissingToken`], [`AuthError::Storage`], or the
    /// classified backend failure.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<Route, AuthError> {
        let identifier = identifier.trim();
        if identifier.is_empty() || password.is_empty() {
            return Err(AuthError::Validation("Please fill in all fields"));
        }

        match self.try_login(identifier, password).await {
            Ok(()) => {
                tracing::info!("Login successful");
                Ok(Route::Profile)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                self.tokens.remove().await;
                Err(e)
            }
        }
    }

    async fn try_login(&self, identifier: &str, password: &str) -> Result<(), AuthError> {
        let response = self.api.login(identifier, password).await?;
        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;
        self.store(&token).await
    }

    /// End the session locally, then tell the backend.
    ///
    /// The local token is always removed; a failed remote call is only
    /// logged.
    pub async fn logout(&self) -> Route {
        let token = self.tokens.get().await;
        self.tokens.remove().await;

        if let Some(token) = token {
            if let Err(e) = self.api.logout(&token).await {
                tracing::warn!(error = %e, "Remote logout failed");
            }
        }
        tracing::info!("Logged out");
        Route::Login
    }

    /// Start password recovery; the backend sends an OTP.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] for an empty identifier, or the classified
    /// backend failure.
    pub async fn forgot_password(&self, identifier: &str) -> Result<Route, AuthError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AuthError::Validation("Please enter your email or phone number"));
        }

        self.api.forgot_password(identifier).await?;
        tracing::info!("Password recovery OTP requested");
        Ok(Route::OtpVerification {
            email: identifier.to_owned(),
            purpose: OtpPurpose::ForgotPassword,
        })
    }

    /// Verify an OTP. A token in the answer starts a session.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] for an empty OTP, [`AuthError::Storage`],
    /// or the classified backend failure.
    pub async fn verify_otp(
        &self,
        email: &str,
        otp: &str,
        purpose: OtpPurpose,
    ) -> Result<Route, AuthError> {
        let otp = otp.trim();
        if otp.is_empty() {
            return Err(AuthError::Validation("OTP is required."));
        }

        let response = self.api.verify_otp(email, otp).await?;
        if let Some(token) = response.token.filter(|t| !t.is_empty()) {
            self.store(&token).await?;
        }

        tracing::info!(?purpose, "OTP verified");
        Ok(match purpose {
            OtpPurpose::ForgotPassword => Route::ResetPassword {
                email: email.to_owned(),
            },
            OtpPurpose::Signup => Route::Profile,
        })
    }

    /// Set a new password after OTP verification.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] for empty or mismatched passwords, or the
    /// classified backend failure.
    pub async fn reset_password(
        &self,
        email: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<Route, AuthError> {
        if password.is_empty() || confirmation.is_empty() {
            return Err(AuthError::Validation("Both password fields are required."));
        }
        if password != confirmation {
            return Err(AuthError::Validation("Passwords do not match."));
        }

        self.api.reset_password(email, password).await?;
        tracing::info!("Password reset");
        Ok(Route::Login)
    }

    /// Create an account from a completed draft and start its session.
    ///
    /// The draft, and with it the password, is dropped before this returns.
    ///
    /// # Errors
    ///
    /// [`AuthError::Signup`] for an incomplete draft (no request is sent),
    /// [`AuthError::MissingToken`], [`AuthError::Storage`], or the
    /// classified backend failure.
    pub async fn signup(&self, draft: SignupDraft) -> Result<Route, AuthError> {
        let response = {
            let request = draft.request()?;
            self.api.signup(&request).await?
        };
        drop(draft);

        let token = response
            .token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;
        self.store(&token).await?;
        tracing::info!("Signup successful");
        Ok(Route::Profile)
    }

    async fn store(&self, token: &Token) -> Result<(), AuthError> {
        if self.tokens.save(token).await {
            Ok(())
        } else {
            Err(AuthError::Storage)
        }
    }
}
