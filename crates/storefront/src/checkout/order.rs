//! Orders placed by the simulated checkout. Orders are never persisted.

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::Serialize;
use symora_core::{PaymentMethod, Price, ProductId, TrackingStage};
use uuid::Uuid;

use crate::cart::Cart;
use crate::payment::PaymentMethodToken;
use crate::pricing::OrderSummary;

const ORDER_NUMBER_PREFIX: &str = "SYMORA-";

/// Days between placing an order and its estimated delivery.
pub const DELIVERY_DAYS: i64 = 3;

/// Customer-facing order number, `SYMORA-` plus the last six digits of the
/// placement time in Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Derive the order number from the placement time.
    #[must_use]
    pub fn from_placed_at(placed_at: DateTime<Utc>) -> Self {
        let suffix = placed_at.timestamp_millis().rem_euclid(1_000_000);
        Self(format!("{ORDER_NUMBER_PREFIX}{suffix:06}"))
    }

    /// The order number string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of one cart line at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Price,
    pub line_total: Price,
}

/// Everything needed to place an order except the payment outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub lines: Vec<OrderLine>,
    pub summary: OrderSummary,
}

impl OrderDraft {
    /// Snapshot a cart and its summary.
    #[must_use]
    pub fn from_cart(cart: &Cart, summary: OrderSummary) -> Self {
        let lines = cart
            .items()
            .iter()
            .map(|item| OrderLine {
                product_id: item.product().id.clone(),
                name: item.product().name.clone(),
                quantity: item.quantity(),
                unit_price: item.product().price,
                line_total: item.line_total(),
            })
            .collect();
        Self { lines, summary }
    }

    /// Turn the draft into a placed order.
    #[must_use]
    pub fn place(
        self,
        payment_method: PaymentMethod,
        payment_token: Option<PaymentMethodToken>,
        placed_at: DateTime<Utc>,
    ) -> Order {
        Order {
            id: Uuid::new_v4(),
            number: OrderNumber::from_placed_at(placed_at),
            placed_at,
            payment_method,
            payment_token,
            lines: self.lines,
            summary: self.summary,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub id: Uuid,
    pub number: OrderNumber,
    pub placed_at: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    /// Token issued by the payment provider; wallet payments have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_token: Option<PaymentMethodToken>,
    pub lines: Vec<OrderLine>,
    pub summary: OrderSummary,
}

impl Order {
    /// Total number of units ordered.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }
}

/// Delivery progress for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTracking {
    pub stage: TrackingStage,
    pub estimated_delivery: NaiveDate,
}

impl OrderTracking {
    /// Start tracking at `Confirmed`.
    #[must_use]
    pub fn start(placed_at: DateTime<Utc>) -> Self {
        Self {
            stage: TrackingStage::Confirmed,
            estimated_delivery: (placed_at + TimeDelta::days(DELIVERY_DAYS)).date_naive(),
        }
    }

    /// Move to the next stage. Returns `false` once delivered.
    pub fn advance(&mut self) -> bool {
        match self.stage.next() {
            Some(next) => {
                self.stage = next;
                true
            }
            None => false,
        }
    }

    /// Whether `stage` has been reached.
    #[must_use]
    pub fn has_reached(&self, stage: TrackingStage) -> bool {
        self.stage >= stage
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use symora_core::CurrencyCode;

    use super::*;
    use crate::catalog::Catalog;
    use crate::config::PricingConfig;

    fn placed_at() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_718_000_123_456).unwrap()
    }

    #[test]
    fn test_order_number_uses_last_six_digits() {
        assert_eq!(OrderNumber::from_placed_at(placed_at()).as_str(), "SYMORA-123456");

        let padded = DateTime::from_timestamp_millis(1_718_000_000_042).unwrap();
        assert_eq!(OrderNumber::from_placed_at(padded).to_string(), "SYMORA-000042");
    }

    #[test]
    fn test_draft_snapshots_cart() {
        let catalog = Catalog::builtin();
        let mut cart = Cart::new(CurrencyCode::EUR);
        let product: &Arc<_> = catalog.get(&ProductId::new("1")).unwrap();
        cart.add(product, 2);

        let summary = OrderSummary::compute(cart.total(), &PricingConfig::default(), None);
        let order = OrderDraft::from_cart(&cart, summary.clone()).place(PaymentMethod::PayPal, None, placed_at());

        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines[0].name, "SYMORA Posture Corrector Pro");
        assert_eq!(order.lines[0].line_total, Price::from_cents(5998, CurrencyCode::EUR));
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.summary, summary);
        assert_eq!(order.number.as_str(), "SYMORA-123456");
        assert!(order.payment_token.is_none());
    }

    #[test]
    fn test_tracking_estimated_delivery() {
        let tracking = OrderTracking::start(placed_at());
        assert_eq!(tracking.stage, TrackingStage::Confirmed);
        assert_eq!(
            tracking.estimated_delivery,
            placed_at().date_naive() + TimeDelta::days(3)
        );
    }

    #[test]
    fn test_tracking_advances_to_delivered() {
        let mut tracking = OrderTracking::start(placed_at());
        assert!(tracking.advance());
        assert!(tracking.has_reached(TrackingStage::Processing));
        assert!(!tracking.has_reached(TrackingStage::Shipped));
        assert!(tracking.advance());
        assert!(tracking.advance());
        assert_eq!(tracking.stage, TrackingStage::Delivered);
        assert!(!tracking.advance());
    }
}
