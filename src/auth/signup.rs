use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

use crate::types::UniId;
use crate::validate::{is_strong_password, is_valid_email, is_valid_phone};

/// User type sent when the draft does not set one.
pub const DEFAULT_USER_TYPE: &str = "user-standard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Gender {
    Male,
    Female,
}

/// Why a signup draft cannot be submitted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SignupError {
    #[error("Please enter your name.")]
    MissingName,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Phone number must be exactly 10 digits.")]
    InvalidPhone,
    #[error(
        "Password must be at least 8 characters and include upper and lower case letters, a number and a special character."
    )]
    WeakPassword,
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("Please choose your gender.")]
    MissingGender,
}

/// Everything collected across the signup screens.
///
/// Passed by value to [`AuthSession::signup`](super::AuthSession::signup).
/// The password bytes are zeroed when the draft is dropped, whether the
/// signup completed or was abandoned.
///
/// ```rust,ignore
/// let draft = SignupDraft::new("Asha Rao", "asha@example.edu", "9876543210")
///     .with_password("Str0ng!pass".into(), "Str0ng!pass".into())
///     .with_gender(Gender::Female)
///     .with_college(college.id.clone());
/// let route = session.signup(draft).await?;
/// ```
pub struct SignupDraft {
    full_name: String,
    email: String,
    phone: String,
    password: Zeroizing<Vec<u8>>,
    confirmation: Zeroizing<Vec<u8>>,
    gender: Option<Gender>,
    user_type: String,
    uni_id: Option<UniId>,
}

impl SignupDraft {
    #[must_use]
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into().trim().to_owned(),
            email: email.into().trim().to_owned(),
            phone: phone.into().trim().to_owned(),
            password: Zeroizing::new(Vec::new()),
            confirmation: Zeroizing::new(Vec::new()),
            gender: None,
            user_type: DEFAULT_USER_TYPE.to_owned(),
            uni_id: None,
        }
    }

    #[must_use]
    pub fn with_password(mut self, password: String, confirmation: String) -> Self {
        self.password = Zeroizing::new(password.into_bytes());
        self.confirmation = Zeroizing::new(confirmation.into_bytes());
        self
    }

    #[must_use]
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    #[must_use]
    pub fn with_user_type(mut self, user_type: impl Into<String>) -> Self {
        self.user_type = user_type.into();
        self
    }

    /// Attach the selected college. May happen at any step.
    #[must_use]
    pub fn with_college(mut self, uni_id: UniId) -> Self {
        self.uni_id = Some(uni_id);
        self
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Check the contact details collected on the first screen.
    ///
    /// # Errors
    ///
    /// The first failing rule, in form order.
    pub fn validate_details(&self) -> Result<(), SignupError> {
        if self.full_name.is_empty() {
            return Err(SignupError::MissingName);
        }
        if !is_valid_email(&self.email) {
            return Err(SignupError::InvalidEmail);
        }
        if !is_valid_phone(&self.phone) {
            return Err(SignupError::InvalidPhone);
        }
        Ok(())
    }

    /// Check the whole draft.
    ///
    /// # Errors
    ///
    /// The first failing rule, in form order.
    pub fn validate(&self) -> Result<(), SignupError> {
        self.validate_details()?;
        if !is_strong_password(self.password_str()) {
            return Err(SignupError::WeakPassword);
        }
        if *self.password != *self.confirmation {
            return Err(SignupError::PasswordMismatch);
        }
        if self.gender.is_none() {
            return Err(SignupError::MissingGender);
        }
        Ok(())
    }

    pub(crate) fn request(&self) -> Result<SignupRequest<'_>, SignupError> {
        self.validate()?;
        let gender = self.gender.ok_or(SignupError::MissingGender)?;
        Ok(SignupRequest {
            full_name: &self.full_name,
            email: &self.email,
            phone: &self.phone,
            password: self.password_str(),
            gender,
            user_type: &self.user_type,
            uni_id: self.uni_id.as_ref(),
        })
    }

    fn password_str(&self) -> &str {
        // Built from a `String`, so always UTF-8.
        std::str::from_utf8(self.password.as_slice()).unwrap_or_default()
    }
}

impl fmt::Debug for SignupDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupDraft")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("password", &"***")
            .field("gender", &self.gender)
            .field("user_type", &self.user_type)
            .field("uni_id", &self.uni_id)
            .finish()
    }
}

/// Wire body of the signup request. Borrows from the draft so the password
/// is never copied.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest<'a> {
    full_name: &'a str,
    email: &'a str,
    phone: &'a str,
    password: &'a str,
    gender: Gender,
    #[serde(rename = "type")]
    user_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    uni_id: Option<&'a UniId>,
}
