//! Payment provider seam.
//!
//! Checkout only needs one thing from a provider: turn raw card details into
//! an opaque payment-method token. [`SimulatedPaymentProvider`] performs the
//! provider's test-mode checks locally; a real network client can implement
//! [`PaymentProvider`] without touching the checkout flow.

mod simulated;

pub use simulated::SimulatedPaymentProvider;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by a payment provider.
///
/// The display strings are shown to the customer verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("Your card number is incomplete.")]
    IncompleteNumber,

    #[error("Your card number is invalid.")]
    InvalidNumber,

    #[error("Your card's expiration date is invalid.")]
    InvalidExpiry,

    #[error("Your card has expired.")]
    Expired,

    #[error("Your card's security code is incomplete.")]
    IncompleteCvc,

    #[error("Your card was declined.")]
    Declined,
}

/// Raw card details as entered in the card field.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CardDetails {
    /// Card number; spaces and dashes are ignored.
    pub number: String,
    pub exp_month: u32,
    /// Four-digit year, or two digits meaning 20xx.
    pub exp_year: i32,
    pub cvc: String,
}

impl CardDetails {
    /// Card number with separators removed.
    #[must_use]
    pub fn digits(&self) -> String {
        self.number
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect()
    }

    /// Last four digits, for display and logs.
    #[must_use]
    pub fn last4(&self) -> String {
        let digits = self.digits();
        let start = digits.len().saturating_sub(4);
        digits.get(start..).unwrap_or_default().to_string()
    }
}

// Never print the full number or the CVC
impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("last4", &self.last4())
            .field("exp_month", &self.exp_month)
            .field("exp_year", &self.exp_year)
            .finish_non_exhaustive()
    }
}

/// Billing details sent along with the card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingDetails {
    pub name: String,
    pub email: String,
    pub address: BillingAddress,
}

/// Billing address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAddress {
    pub line1: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Opaque payment-method token issued by the provider (`pm_...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentMethodToken(String);

impl PaymentMethodToken {
    /// Wrap a provider-issued token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentMethodToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A payment provider able to tokenize card details.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a payment method from card and billing details.
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentError`] if the provider rejects the card.
    async fn create_payment_method(
        &self,
        card: &CardDetails,
        billing: &BillingDetails,
    ) -> Result<PaymentMethodToken, PaymentError>;
}
