#![doc = include_str!("../README.md")]

pub mod api;
pub mod auth;
pub mod cart;
#[cfg(feature = "http")]
pub mod client;
pub mod config;
pub mod error;
pub mod favorites;
pub mod models;
pub mod notify;
pub mod route;
pub mod storage;
pub mod types;
pub mod validate;

#[cfg(test)]
mod testing;

// Re-exports for convenient access
pub use api::{AuthApi, CartApi, CartItemRef, CatalogApi, FavoritesApi};
pub use auth::{AuthError, AuthSession, Gender, SignupDraft, SignupError};
pub use cart::{AvailabilityChecker, CartError, CartItem, CartReconciler, Category};
#[cfg(feature = "http")]
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::Error;
pub use favorites::{FavoritesView, UNKNOWN_VENDOR};
pub use models::{CartLine, College, FavoriteItem, User, Vendor};
pub use notify::{CartAction, Level, Notification, Notifier, TracingNotifier};
pub use route::{OtpPurpose, Route};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, TokenStore};
pub use types::{ItemId, Token, UniId, UserId, VendorId};
pub use validate::{is_strong_password, is_valid_email, is_valid_phone};
