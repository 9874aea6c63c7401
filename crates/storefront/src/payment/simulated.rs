use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use tracing::instrument;
use uuid::Uuid;

use super::{BillingDetails, CardDetails, PaymentError, PaymentMethodToken, PaymentProvider};
use crate::config::PaymentConfig;

/// Test card that always succeeds.
pub const DEMO_CARD_NUMBER: &str = "4242424242424242";

/// Test card that is always declined.
pub const DECLINED_CARD_NUMBER: &str = "4000000000000002";

const CARD_NUMBER_LEN: usize = 16;

/// American Express numbers start with 34 or 37 and are one digit shorter.
const AMEX_PREFIXES: [&str; 2] = ["34", "37"];
const AMEX_NUMBER_LEN: usize = 15;

/// Provider that validates cards locally the way the provider's test mode
/// does, then issues a random token.
#[derive(Debug, Clone)]
pub struct SimulatedPaymentProvider {
    publishable_key: String,
}

impl SimulatedPaymentProvider {
    /// Create a provider from validated payment configuration.
    #[must_use]
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            publishable_key: config.publishable_key.clone(),
        }
    }

    /// Whether the provider was configured with a test key.
    #[must_use]
    pub fn is_test_mode(&self) -> bool {
        self.publishable_key.starts_with("pk_test_")
    }

    /// Check a card as of `today`.
    ///
    /// # Errors
    ///
    /// Returns the first [`PaymentError`] the card fails on: number, then
    /// expiry, then CVC, then the decline list.
    pub fn validate_card(card: &CardDetails, today: NaiveDate) -> Result<(), PaymentError> {
        let digits = card.digits();
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PaymentError::InvalidNumber);
        }
        let expected_len = if AMEX_PREFIXES.iter().any(|prefix| digits.starts_with(prefix)) {
            AMEX_NUMBER_LEN
        } else {
            CARD_NUMBER_LEN
        };
        if digits.len() < expected_len {
            return Err(PaymentError::IncompleteNumber);
        }
        if digits.len() > expected_len || !luhn_valid(&digits) {
            return Err(PaymentError::InvalidNumber);
        }

        if !(1..=12).contains(&card.exp_month) {
            return Err(PaymentError::InvalidExpiry);
        }
        let exp_year = if (0..100).contains(&card.exp_year) {
            2000 + card.exp_year
        } else {
            card.exp_year
        };
        // Cards are valid through the end of their expiry month
        if (exp_year, card.exp_month) < (today.year(), today.month()) {
            return Err(PaymentError::Expired);
        }

        let cvc = card.cvc.trim();
        if !(3..=4).contains(&cvc.len()) || !cvc.chars().all(|c| c.is_ascii_digit()) {
            return Err(PaymentError::IncompleteCvc);
        }

        if digits == DECLINED_CARD_NUMBER {
            return Err(PaymentError::Declined);
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentProvider for SimulatedPaymentProvider {
    #[instrument(skip(self, card, billing), fields(last4 = %card.last4()))]
    async fn create_payment_method(
        &self,
        card: &CardDetails,
        billing: &BillingDetails,
    ) -> Result<PaymentMethodToken, PaymentError> {
        if let Err(e) = Self::validate_card(card, Utc::now().date_naive()) {
            tracing::info!(error = %e, "Card rejected");
            return Err(e);
        }

        let token = PaymentMethodToken::new(format!("pm_{}", Uuid::new_v4().simple()));
        tracing::info!(
            token = %token,
            country = %billing.address.country,
            test_mode = self.is_test_mode(),
            "Payment method created"
        );
        Ok(token)
    }
}

/// Luhn checksum over an all-digit string.
fn luhn_valid(digits: &str) -> bool {
    let sum: u32 = digits
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}
