//! Payloads exchanged with the canteen backend.
//!
//! Field names follow the backend's JSON (`_id`, camelCase). These are read
//! models; nothing here is mutated locally after it has been received.

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, Token, UniId, UserId, VendorId};

/// Signed-in user profile from `GET /api/user/auth/user`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default, alias = "name")]
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub uni_id: Option<UniId>,
}

impl User {
    /// Create a `User` with only the required `id`.
    #[must_use]
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            full_name: String::new(),
            email: None,
            phone: None,
            uni_id: None,
        }
    }

    #[must_use]
    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = name.into();
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// A college the backend serves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct College {
    #[serde(rename = "_id")]
    pub id: UniId,
    pub full_name: String,
    #[serde(default)]
    pub short_name: String,
}

impl College {
    #[must_use]
    pub fn new(id: UniId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            short_name: String::new(),
        }
    }
}

/// Entry of a university's vendor directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Vendor {
    #[serde(rename = "_id")]
    pub id: VendorId,
    pub name: String,
}

impl Vendor {
    #[must_use]
    pub fn new(id: VendorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A vendor offering a specific item, with its live inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct VendorListing {
    #[serde(rename = "_id")]
    pub id: VendorId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub inventory_value: Option<Inventory>,
}

impl VendorListing {
    #[must_use]
    pub fn new(id: VendorId, inventory_value: Option<Inventory>) -> Self {
        Self {
            id,
            name: None,
            price: None,
            inventory_value,
        }
    }
}

/// Inventory snapshot of one vendor for one item.
///
/// `quantity` is kept as raw JSON: retail stock must be a real number, and a
/// malformed value has to read as "no stock" rather than fail the whole list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Inventory {
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub quantity: Option<serde_json::Value>,
    #[serde(default)]
    pub is_available: Option<String>,
}

impl Inventory {
    /// Retail inventory with a numeric stock count.
    #[must_use]
    pub fn stock(quantity: i64) -> Self {
        Self {
            quantity: Some(quantity.into()),
            ..Self::default()
        }
    }

    /// Made-to-order inventory with an availability flag (`"Y"` / `"N"`).
    #[must_use]
    pub fn flag(is_available: impl Into<String>) -> Self {
        Self {
            is_available: Some(is_available.into()),
            ..Self::default()
        }
    }

    /// Numeric stock, if the backend sent a number.
    #[must_use]
    pub fn quantity(&self) -> Option<f64> {
        self.quantity.as_ref().and_then(serde_json::Value::as_f64)
    }
}

/// A favorited menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct FavoriteItem {
    #[serde(rename = "_id")]
    pub id: ItemId,
    pub name: String,
    /// Menu category (`chips`, `veg`, ...), drives availability rules.
    #[serde(rename = "type")]
    pub category: String,
    pub uni_id: UniId,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub is_special: Option<String>,
    /// Cart kind tag, echoed back to the cart endpoints.
    #[serde(default)]
    pub kind: String,
    pub vendor_id: VendorId,
    #[serde(default)]
    pub vendor_name: Option<String>,
}

impl FavoriteItem {
    #[must_use]
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        category: impl Into<String>,
        uni_id: UniId,
        vendor_id: VendorId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            uni_id,
            unit: None,
            price: 0.0,
            image: String::new(),
            is_special: None,
            kind: String::new(),
            vendor_id,
            vendor_name: None,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    #[must_use]
    pub fn with_vendor_name(mut self, name: impl Into<String>) -> Self {
        self.vendor_name = Some(name.into());
        self
    }
}

/// One line of the authoritative remote cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct CartLine {
    pub item_id: ItemId,
    pub kind: String,
    pub quantity: u32,
    pub vendor_id: VendorId,
    #[serde(default)]
    pub vendor_name: Option<String>,
}

impl CartLine {
    #[must_use]
    pub fn new(item_id: ItemId, kind: impl Into<String>, quantity: u32, vendor_id: VendorId) -> Self {
        Self {
            item_id,
            kind: kind.into(),
            quantity,
            vendor_id,
            vendor_name: None,
        }
    }
}

/// Body of `GET /cart/{userId}`.
///
/// Older carts store the vendor once at cart level; lines without their own
/// vendor fields inherit it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    #[serde(default)]
    pub cart: Vec<RawCartLine>,
    #[serde(default)]
    pub vendor_id: Option<VendorId>,
    #[serde(default)]
    pub vendor_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCartLine {
    pub item_id: ItemId,
    pub quantity: u32,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub vendor_id: Option<VendorId>,
    #[serde(default)]
    pub vendor_name: Option<String>,
}

impl CartResponse {
    /// Resolve each line's vendor, dropping lines with no vendor at all.
    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        let Self {
            cart,
            vendor_id,
            vendor_name,
        } = self;

        cart.into_iter()
            .filter_map(|raw| {
                let Some(line_vendor) = raw.vendor_id.or_else(|| vendor_id.clone()) else {
                    tracing::warn!(item_id = %raw.item_id, "Cart line without vendor dropped");
                    return None;
                };
                Some(CartLine {
                    item_id: raw.item_id,
                    kind: raw.kind,
                    quantity: raw.quantity,
                    vendor_id: line_vendor,
                    vendor_name: raw.vendor_name.or_else(|| vendor_name.clone()),
                })
            })
            .collect()
    }
}

/// Body of a successful login or signup.
#[derive(Debug, Clone, Default, Deserialize)]
#[non_exhaustive]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<Token>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LoginResponse {
    #[must_use]
    pub fn with_token(token: Token) -> Self {
        Self {
            token: Some(token),
            message: None,
        }
    }
}
