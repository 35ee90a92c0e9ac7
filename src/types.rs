use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Backend user identifier (`_id` of the user document).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct UserId(pub String);

/// Menu item identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct ItemId(pub String);

/// Vendor (canteen stall) identifier.
///
/// A cart is bound to exactly one vendor at a time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct VendorId(pub String);

/// University (college) identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct UniId(pub String);

macro_rules! str_conversions {
    ($($name:ident),*) => {$(
        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl $name {
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    )*};
}

str_conversions!(UserId, ItemId, VendorId, UniId);

/// Opaque bearer credential issued on login, signup or OTP verification.
///
/// `Debug` never prints the value and there is no `Display`, so the token
/// cannot end up in logs by accident.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, From)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_transparently() {
        let id = VendorId::from("v1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"v1\"");
        let parsed: VendorId = serde_json::from_str("\"v1\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = Token::from("secret-value");
        assert_eq!(format!("{token:?}"), "Token(***)");
        assert_eq!(token.as_str(), "secret-value");
    }

    #[test]
    fn newtypes_prevent_mixing() {
        fn takes_vendor(_: &VendorId) {}
        fn takes_item(_: &ItemId) {}

        let vendor = VendorId::from("id");
        let item = ItemId::from("id");

        takes_vendor(&vendor);
        takes_item(&item);
        // takes_vendor(&item);  // Compile error!
    }
}
