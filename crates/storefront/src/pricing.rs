//! Order summary shown in the cart panel and attached to every order.

use rust_decimal::Decimal;
use serde::Serialize;
use symora_core::Price;

use crate::config::PricingConfig;
use crate::promotions::DiscountCode;

/// Subtotal, discount, shipping, tax and total for a cart.
///
/// Every amount is rounded to two decimals, midpoint away from zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub subtotal: Price,
    pub discount: Price,
    /// Code behind `discount`, if one was applied.
    pub discount_code: Option<String>,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Compute the summary for a cart subtotal.
    ///
    /// Shipping is always free. Tax is charged on the discounted subtotal.
    #[must_use]
    pub fn compute(subtotal: Price, pricing: &PricingConfig, discount: Option<&DiscountCode>) -> Self {
        let currency = subtotal.currency_code;
        let subtotal = subtotal.rounded();

        let discount_amount = discount.map_or(Price::zero(currency), |code| subtotal.scale(code.rate()));
        let taxable = subtotal.amount - discount_amount.amount;
        let tax = Price::new(taxable, currency).scale(pricing.vat_rate);
        let shipping = Price::zero(currency);
        let total = Price::new(taxable + shipping.amount + tax.amount, currency).rounded();

        Self {
            subtotal,
            discount: discount_amount,
            discount_code: discount.map(|code| code.code.clone()),
            shipping,
            tax,
            total,
        }
    }

    /// Whether a discount reduced the subtotal.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.discount.amount > Decimal::ZERO
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use symora_core::CurrencyCode;

    use super::*;

    fn eur(cents: i64) -> Price {
        Price::from_cents(cents, CurrencyCode::EUR)
    }

    #[test]
    fn test_summary_without_discount() {
        let summary = OrderSummary::compute(eur(5998), &PricingConfig::default(), None);

        assert_eq!(summary.subtotal, eur(5998));
        assert!(summary.discount.is_zero());
        assert!(summary.shipping.is_zero());
        // 59.98 * 0.21 = 12.5958
        assert_eq!(summary.tax, eur(1260));
        assert_eq!(summary.total, eur(7258));
        assert!(!summary.has_discount());
    }

    #[test]
    fn test_summary_with_discount() {
        let code = DiscountCode::lookup("SAVE10").unwrap();
        let summary = OrderSummary::compute(eur(5998), &PricingConfig::default(), Some(&code));

        // 59.98 * 0.10 = 5.998
        assert_eq!(summary.discount, eur(600));
        // (59.98 - 6.00) * 0.21 = 11.3358
        assert_eq!(summary.tax, eur(1134));
        assert_eq!(summary.total, eur(6532));
        assert_eq!(summary.discount_code.as_deref(), Some("SAVE10"));
    }

    #[test]
    fn test_summary_of_empty_cart() {
        let summary = OrderSummary::compute(Price::zero(CurrencyCode::EUR), &PricingConfig::default(), None);
        assert!(summary.total.is_zero());
        assert!(summary.tax.is_zero());
    }

    #[test]
    fn test_custom_vat_rate() {
        let pricing = PricingConfig {
            vat_rate: Decimal::new(9, 2),
            ..PricingConfig::default()
        };
        let summary = OrderSummary::compute(eur(10000), &pricing, None);
        assert_eq!(summary.tax, eur(900));
        assert_eq!(summary.total, eur(10900));
    }
}
