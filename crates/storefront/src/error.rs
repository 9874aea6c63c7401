//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for storefront session operations.
//! Infrastructure failures are captured to Sentry via [`AppError::report`];
//! customer-facing failures only get a user message.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::preferences::StorageError;
use crate::promotions::PromotionError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Checkout flow rejected an event.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Preferences store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Promotion could not be applied.
    #[error("Promotion error: {0}")]
    Promotion(#[from] PromotionError),

    /// Configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Checkout was requested with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Bad input from the customer.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this error indicates a fault in the storefront rather than in
    /// customer input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Storage(_)
                | Self::Catalog(_)
                | Self::Config(_)
                | Self::Promotion(PromotionError::Storage(_))
        )
    }

    /// Message safe to show to the customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(_)
            | Self::Catalog(_)
            | Self::Config(_)
            | Self::Promotion(PromotionError::Storage(_)) => {
                "Something went wrong. Please try again.".to_string()
            }
            Self::Checkout(CheckoutError::InvalidTransition { .. }) => {
                "Checkout cannot do that right now. Please try again.".to_string()
            }
            Self::Checkout(err) => err.to_string(),
            Self::Promotion(err) => err.to_string(),
            Self::EmptyCart => "Your cart is empty".to_string(),
            _ => self.to_string(),
        }
    }

    /// Log the error and capture internal errors to Sentry.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::warn!(error = %self, "Storefront request rejected");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for customer actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of customer
/// actions leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
