/// Why an OTP is being verified; decides where the flow continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OtpPurpose {
    Signup,
    ForgotPassword,
}

/// Navigation target returned by session flows.
///
/// The crate never navigates itself; the embedding app maps these onto its
/// router.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Route {
    Login,
    Profile,
    Favorites,
    OtpVerification { email: String, purpose: OtpPurpose },
    ResetPassword { email: String },
    /// Server-supplied path (login `redirectTo`).
    External(String),
}

impl Route {
    /// Router path of the screen.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Login => "/login/LoginForm",
            Self::Profile => "/profile/ProfilePage",
            Self::Favorites => "/fav/FavouritePage",
            Self::OtpVerification { .. } => "/otpverification/OtpVerification",
            Self::ResetPassword { .. } => "/resetpassword/ResetPassword",
            Self::External(path) => path,
        }
    }

    /// Query parameters the target screen expects.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::OtpVerification { email, purpose } => {
                let mut params = vec![("email", email.clone())];
                if *purpose == OtpPurpose::ForgotPassword {
                    params.push(("from", "forgotpassword".to_owned()));
                }
                params
            }
            Self::ResetPassword { email } => vec![("email", email.clone())],
            _ => Vec::new(),
        }
    }
}
