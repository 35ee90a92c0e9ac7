//! User-facing notifications, decoupled from the logic that triggers them.

use std::sync::Arc;

use crate::cart::CartError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Success,
    Info,
    Error,
}

/// A toast-style message for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub message: Option<String>,
}

impl Notification {
    #[must_use]
    pub fn new(level: Level, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Message shown when `action` on `item_name` succeeded.
    #[must_use]
    pub fn for_cart_success(action: CartAction, item_name: &str) -> Self {
        match action {
            CartAction::Add => Self::new(Level::Success, "Added to Cart")
                .with_message(format!("{item_name} has been added successfully.")),
            CartAction::Increase => Self::new(Level::Success, "Quantity Increased")
                .with_message(format!("Increased quantity of {item_name}")),
            CartAction::Decrease => {
                Self::new(Level::Info, format!("Decreased quantity of {item_name}"))
            }
            CartAction::Clear => Self::new(Level::Success, "Cart cleared successfully"),
        }
    }

    /// Message shown when `action` on `item_name` failed with `error`.
    #[must_use]
    pub fn for_cart_error(error: &CartError, action: CartAction, item_name: &str) -> Self {
        match error {
            CartError::VendorConflict { .. } => Self::new(Level::Error, "Vendor Conflict")
                .with_message("Add items from the same vendor only. Please clear your cart first."),
            CartError::ItemUnavailable => Self::new(Level::Error, "Item Unavailable")
                .with_message("This item is currently unavailable. Try again later."),
            CartError::QuantityLimitReached => Self::new(Level::Info, "Limit Reached")
                .with_message(format!("Maximum limit reached for {item_name}")),
            CartError::LimitedStock(available) => Self::new(Level::Info, "Limited Availability")
                .with_message(format!("Only {available} available for {item_name}")),
            CartError::Unauthenticated => {
                Self::new(Level::Error, "Session Expired").with_message("Please log in again.")
            }
            CartError::OperationFailed(message) if !message.is_empty() => {
                Self::new(Level::Error, "Error").with_message(message.clone())
            }
            CartError::NetworkFailure(_) | CartError::OperationFailed(_) => {
                Self::new(Level::Error, "Failed").with_message(action.failure_text())
            }
        }
    }
}

/// A user-triggered cart action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartAction {
    Add,
    Increase,
    Decrease,
    Clear,
}

impl CartAction {
    fn failure_text(self) -> &'static str {
        match self {
            Self::Add => "Failed to add item to cart",
            Self::Increase => "Failed to increase quantity",
            Self::Decrease => "Failed to decrease quantity",
            Self::Clear => "Failed to clear cart",
        }
    }
}

/// Notification dispatch capability.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Writes notifications to the `tracing` pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        let message = n.message.as_deref().unwrap_or_default();
        match n.level {
            Level::Success | Level::Info => {
                tracing::info!(title = %n.title, detail = message, "Notification");
            }
            Level::Error => tracing::warn!(title = %n.title, detail = message, "Notification"),
        }
    }
}
