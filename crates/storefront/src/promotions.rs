//! Promotional offers: coupon capture, discount codes, bundle deals and
//! free-shipping progress.

use std::time::Duration;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use symora_core::{Email, Price};
use thiserror::Error;

use crate::preferences::{KeyValueStore, Preferences, StorageError};

/// Code issued to customers who hand over their email.
pub const WELCOME_CODE: &str = "SAVE10";

/// Errors that can occur when applying promotions.
#[derive(Debug, Error)]
pub enum PromotionError {
    /// No discount code has been issued to this customer.
    #[error("No discount code has been issued yet")]
    NoCodeIssued,

    /// The entered code does not match the issued one.
    #[error("Discount code {0} is not valid")]
    InvalidCode(String),

    /// Preferences could not be read or written.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A percentage discount code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscountCode {
    pub code: String,
    pub percentage: u32,
}

impl DiscountCode {
    /// Look up a known code (case-insensitive).
    #[must_use]
    pub fn lookup(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            WELCOME_CODE => Some(Self {
                code: WELCOME_CODE.to_string(),
                percentage: 10,
            }),
            _ => None,
        }
    }

    /// Discount as a fraction (10% = 0.10).
    #[must_use]
    pub fn rate(&self) -> Decimal {
        Decimal::from(self.percentage) / Decimal::ONE_HUNDRED
    }
}

// =============================================================================
// Coupon Offer
// =============================================================================

/// The "10% off your first order" email capture offer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CouponOffer;

impl CouponOffer {
    /// How long after the session starts the offer appears.
    pub const SHOW_AFTER: Duration = Duration::from_secs(5);

    /// Whether the offer should be shown `elapsed` into the session: the
    /// delay has passed, it was never seen and no email was captured.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if preferences cannot be read.
    pub fn should_offer<S: KeyValueStore>(
        prefs: &Preferences<S>,
        elapsed: Duration,
    ) -> Result<bool, StorageError> {
        if elapsed < Self::SHOW_AFTER {
            return Ok(false);
        }
        Ok(!prefs.coupon_popup_seen()? && prefs.user_email()?.is_none())
    }

    /// Accept an email: remembers the customer and issues the welcome code.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if preferences cannot be written.
    pub fn submit<S: KeyValueStore>(
        prefs: &mut Preferences<S>,
        email: &Email,
    ) -> Result<DiscountCode, PromotionError> {
        prefs.mark_coupon_popup_seen()?;
        prefs.set_user_email(email)?;
        prefs.set_discount_code(WELCOME_CODE)?;
        tracing::info!(domain = email.domain(), code = WELCOME_CODE, "Coupon email captured");

        DiscountCode::lookup(WELCOME_CODE)
            .ok_or_else(|| PromotionError::InvalidCode(WELCOME_CODE.to_string()))
    }

    /// Close the offer without an email. It will not be shown again.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if preferences cannot be written.
    pub fn dismiss<S: KeyValueStore>(prefs: &mut Preferences<S>) -> Result<(), StorageError> {
        prefs.mark_coupon_popup_seen()
    }
}

/// Apply an entered discount code.
///
/// The code must match the one issued to this customer.
///
/// # Errors
///
/// Returns a [`PromotionError`] if no code was issued, the code does not
/// match, or preferences cannot be accessed.
pub fn apply_discount_code<S: KeyValueStore>(
    prefs: &mut Preferences<S>,
    entered: &str,
) -> Result<DiscountCode, PromotionError> {
    let issued = prefs.discount_code()?.ok_or(PromotionError::NoCodeIssued)?;
    let entered = entered.trim().to_ascii_uppercase();

    if !entered.eq_ignore_ascii_case(issued.trim()) {
        return Err(PromotionError::InvalidCode(entered));
    }

    let code = DiscountCode::lookup(&entered).ok_or(PromotionError::InvalidCode(entered))?;

    prefs.set_discount_applied(true)?;
    tracing::info!(code = %code.code, "Discount code applied");
    Ok(code)
}

/// The discount currently in effect, if the customer applied one.
///
/// # Errors
///
/// Returns a [`StorageError`] if preferences cannot be read.
pub fn active_discount<S: KeyValueStore>(prefs: &Preferences<S>) -> Result<Option<DiscountCode>, StorageError> {
    if !prefs.discount_applied()? {
        return Ok(None);
    }
    Ok(prefs.discount_code()?.as_deref().and_then(DiscountCode::lookup))
}

// =============================================================================
// Bundle Offer
// =============================================================================

/// "Buy two, save 15%" bundle for a single product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BundleOffer {
    pub unit_price: Price,
    pub quantity: u32,
    pub regular_price: Price,
    pub bundle_price: Price,
    pub savings: Price,
    pub savings_percentage: u32,
}

impl BundleOffer {
    /// Units in the bundle.
    pub const QUANTITY: u32 = 2;

    /// Bundle discount as a fraction.
    pub const DISCOUNT_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

    /// Price the bundle for a product at `unit_price`.
    #[must_use]
    pub fn for_price(unit_price: Price) -> Self {
        let regular_price = unit_price.times(Self::QUANTITY);
        let bundle_price = regular_price.scale(Decimal::ONE - Self::DISCOUNT_RATE);
        let savings = Price::new(regular_price.amount - bundle_price.amount, unit_price.currency_code);
        let savings_percentage = if regular_price.is_zero() {
            0
        } else {
            (savings.amount / regular_price.amount * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_u32()
                .unwrap_or(0)
        };

        Self {
            unit_price,
            quantity: Self::QUANTITY,
            regular_price,
            bundle_price,
            savings,
            savings_percentage,
        }
    }
}

// =============================================================================
// Free Shipping Progress
// =============================================================================

/// Progress towards the free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreeShippingProgress {
    pub threshold: Price,
    /// Percentage of the threshold reached, capped at 100.
    pub percent: u32,
    /// Amount still needed, never negative.
    pub remaining: Price,
}

impl FreeShippingProgress {
    /// Compute progress for a cart total against a threshold in the same currency.
    #[must_use]
    pub fn new(current_total: Price, threshold: Decimal) -> Self {
        let currency = current_total.currency_code;
        let percent = if threshold <= Decimal::ZERO {
            100
        } else {
            (current_total.amount / threshold * Decimal::ONE_HUNDRED)
                .min(Decimal::ONE_HUNDRED)
                .floor()
                .to_u32()
                .unwrap_or(0)
        };
        let remaining = (threshold - current_total.amount).max(Decimal::ZERO);

        Self {
            threshold: Price::new(threshold, currency),
            percent,
            remaining: Price::new(remaining, currency),
        }
    }

    /// Whether the threshold has been reached.
    #[must_use]
    pub const fn qualifies(&self) -> bool {
        self.remaining.is_zero()
    }
}
