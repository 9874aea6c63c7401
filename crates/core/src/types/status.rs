//! Status enums for checkout and order tracking.

use serde::{Deserialize, Serialize};

/// Payment methods offered in the checkout modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Credit or debit card, tokenized by the payment provider.
    #[default]
    Card,
    /// Apple Pay (only offered where the platform supports it).
    ApplePay,
    /// Google Pay.
    GooglePay,
    /// `PayPal` redirect.
    PayPal,
}

impl PaymentMethod {
    /// All methods in the order they are presented.
    pub const ALL: [Self; 4] = [Self::Card, Self::ApplePay, Self::GooglePay, Self::PayPal];

    /// Human-readable name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Card => "Credit or Debit Card",
            Self::ApplePay => "Apple Pay",
            Self::GooglePay => "Google Pay",
            Self::PayPal => "PayPal",
        }
    }

    /// Short description shown under the label.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Card => "Visa, Mastercard, American Express",
            Self::ApplePay => "Touch ID or Face ID",
            Self::GooglePay => "Pay with Google",
            Self::PayPal => "Pay with your PayPal account",
        }
    }

    /// Wallet methods skip the card form and go straight to processing.
    #[must_use]
    pub const fn is_wallet(&self) -> bool {
        !matches!(self, Self::Card)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Card => write!(f, "card"),
            Self::ApplePay => write!(f, "apple_pay"),
            Self::GooglePay => write!(f, "google_pay"),
            Self::PayPal => write!(f, "paypal"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "apple_pay" | "apple-pay" | "apple" => Ok(Self::ApplePay),
            "google_pay" | "google-pay" | "google" => Ok(Self::GooglePay),
            "paypal" => Ok(Self::PayPal),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Simulated order tracking stages, in delivery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrackingStage {
    /// Payment has been processed.
    #[default]
    Confirmed,
    /// Items are being prepared.
    Processing,
    /// On the way to the customer.
    Shipped,
    /// Delivered.
    Delivered,
}

impl TrackingStage {
    /// All stages in order.
    pub const ALL: [Self; 4] = [
        Self::Confirmed,
        Self::Processing,
        Self::Shipped,
        Self::Delivered,
    ];

    /// Step title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Confirmed => "Order Confirmed",
            Self::Processing => "Processing Order",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
        }
    }

    /// Step description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Confirmed => "Your payment has been processed successfully",
            Self::Processing => "We're carefully preparing your items",
            Self::Shipped => "Your order is on its way to you",
            Self::Delivered => "Enjoy your SYMORA products!",
        }
    }

    /// The following stage, or `None` once delivered.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Confirmed => Some(Self::Processing),
            Self::Processing => Some(Self::Shipped),
            Self::Shipped => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    /// Zero-based position in [`Self::ALL`].
    #[must_use]
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for TrackingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_roundtrip_display() {
        for method in PaymentMethod::ALL {
            let parsed: PaymentMethod = method.to_string().parse().unwrap();
            assert_eq!(parsed, method);
        }
    }

    #[test]
    fn test_payment_method_aliases() {
        assert_eq!("apple".parse::<PaymentMethod>().unwrap(), PaymentMethod::ApplePay);
        assert_eq!("google-pay".parse::<PaymentMethod>().unwrap(), PaymentMethod::GooglePay);
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_only_card_is_not_wallet() {
        assert!(!PaymentMethod::Card.is_wallet());
        assert!(PaymentMethod::PayPal.is_wallet());
    }

    #[test]
    fn test_tracking_stage_progression() {
        let mut stage = TrackingStage::Confirmed;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            stage = next;
            seen.push(stage);
        }
        assert_eq!(seen, TrackingStage::ALL);
        assert_eq!(TrackingStage::Shipped.index(), 2);
    }
}
