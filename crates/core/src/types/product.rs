//! Catalog product type.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// A product in the catalog.
///
/// Products are immutable once loaded. The field names serialize in
/// camelCase so catalog files can be shared with the web frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Price before the current promotion, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    #[serde(default)]
    pub images: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub category: CategoryId,
    #[serde(default)]
    pub is_on_sale: bool,
    #[serde(default)]
    pub is_best_seller: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_limited_time: bool,
}

impl Product {
    /// First image, used for thumbnails.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Amount saved against the original price.
    ///
    /// `None` when there is no original price, it is in another currency, or
    /// it is not above the current price.
    #[must_use]
    pub fn savings(&self) -> Option<Price> {
        let original = self.original_price?;
        let saved = original.checked_sub(self.price)?;
        (saved.amount > Decimal::ZERO).then_some(saved)
    }

    /// Whole-percent discount against the original price, rounded.
    #[must_use]
    pub fn discount_percentage(&self) -> Option<u32> {
        let saved = self.savings()?;
        let original = self.original_price?;
        let percent = (saved.amount / original.amount * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        percent.to_u32()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::CurrencyCode;

    fn product(price_cents: i64, original_cents: Option<i64>) -> Product {
        Product {
            id: ProductId::new("1"),
            name: "SYMORA Posture Corrector Pro".to_string(),
            price: Price::from_cents(price_cents, CurrencyCode::EUR),
            original_price: original_cents.map(|c| Price::from_cents(c, CurrencyCode::EUR)),
            images: vec!["/posture.png".to_string()],
            description: "X-strap posture corrector".to_string(),
            benefits: Vec::new(),
            category: CategoryId::new("posture"),
            is_on_sale: true,
            is_best_seller: false,
            is_new: false,
            is_limited_time: false,
        }
    }

    #[test]
    fn test_discount_percentage_rounds() {
        // (49.99 - 29.99) / 49.99 = 40.008%
        assert_eq!(product(2999, Some(4999)).discount_percentage(), Some(40));
        // (44.99 - 29.99) / 44.99 = 33.34%
        assert_eq!(product(2999, Some(4499)).discount_percentage(), Some(33));
    }

    #[test]
    fn test_no_discount_without_higher_original() {
        assert_eq!(product(2999, None).discount_percentage(), None);
        assert_eq!(product(2999, Some(2999)).savings(), None);
        assert_eq!(product(2999, Some(1999)).discount_percentage(), None);
    }

    #[test]
    fn test_savings() {
        let saved = product(2999, Some(3999)).savings().unwrap();
        assert_eq!(saved.display(), "€10.00");
    }

    #[test]
    fn test_deserialize_camel_case_with_defaults() {
        let json = r#"{
            "id": "9",
            "name": "Test",
            "price": {"amount": "10.00", "currency_code": "EUR"},
            "description": "d",
            "category": "massage",
            "isNew": true
        }"#;
        let parsed: Product = serde_json::from_str(json).unwrap();
        assert!(parsed.is_new);
        assert!(!parsed.is_on_sale);
        assert!(parsed.original_price.is_none());
        assert_eq!(parsed.primary_image(), None);
    }
}
