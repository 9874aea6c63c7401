//! Product catalog.
//!
//! The catalog is a static, immutable product list. It ships with the
//! built-in SYMORA range and can be replaced with a JSON file (an array of
//! products in the same camelCase shape the web frontend uses).
//!
//! Construction validates the list once so the cart can rely on it: ids are
//! unique, prices are positive, and every price is in the store currency.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;
use symora_core::{CategoryId, CurrencyCode, Price, Product, ProductId};
use thiserror::Error;
use tracing::instrument;

/// Errors that can occur when building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog file is not a valid product list.
    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share an id.
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),

    /// A product is priced in a different currency than the store.
    #[error("product {id} is priced in {found}, store currency is {expected}")]
    CurrencyMismatch {
        id: ProductId,
        expected: CurrencyCode,
        found: CurrencyCode,
    },

    /// A product has a zero or negative price.
    #[error("product {0} must have a positive price")]
    NonPositivePrice(ProductId),
}

/// An immutable, validated product list.
#[derive(Debug, Clone)]
pub struct Catalog {
    currency: CurrencyCode,
    products: Vec<Arc<Product>>,
}

impl Catalog {
    /// Build a catalog from a product list.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] for duplicate ids, non-positive prices, or
    /// prices outside the store currency.
    pub fn new(products: Vec<Product>, currency: CurrencyCode) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id.clone()) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
            if product.price.amount <= Decimal::ZERO {
                return Err(CatalogError::NonPositivePrice(product.id.clone()));
            }
            for price in std::iter::once(&product.price).chain(product.original_price.as_ref()) {
                if price.currency_code != currency {
                    return Err(CatalogError::CurrencyMismatch {
                        id: product.id.clone(),
                        expected: currency,
                        found: price.currency_code,
                    });
                }
            }
        }

        Ok(Self {
            currency,
            products: products.into_iter().map(Arc::new).collect(),
        })
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the file cannot be read, parsed or validated.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn from_json_file(path: &Path, currency: CurrencyCode) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let products: Vec<Product> = serde_json::from_str(&raw)?;
        let catalog = Self::new(products, currency)?;
        tracing::info!(products = catalog.len(), "Loaded catalog file");
        Ok(catalog)
    }

    /// The built-in SYMORA product range (priced in EUR).
    #[must_use]
    pub fn builtin() -> Self {
        match Self::new(builtin_products(), CurrencyCode::EUR) {
            Ok(catalog) => catalog,
            Err(e) => unreachable!("built-in catalog is invalid: {e}"),
        }
    }

    /// Load the configured catalog: the JSON file when one is set, otherwise
    /// the built-in range (which must match the store currency).
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the catalog cannot be loaded or validated.
    pub fn load(path: Option<&Path>, currency: CurrencyCode) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_json_file(path, currency),
            None => Self::new(builtin_products(), currency),
        }
    }

    /// Store currency of every product in the catalog.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Arc<Product>> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// All products in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Product>> {
        self.products.iter()
    }

    /// Products in a category, in catalog order.
    pub fn by_category<'a>(
        &'a self,
        category: &'a CategoryId,
    ) -> impl Iterator<Item = &'a Arc<Product>> + 'a {
        self.products
            .iter()
            .filter(move |product| &product.category == category)
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&CategoryId> {
        let mut categories: Vec<&CategoryId> = Vec::new();
        for product in &self.products {
            if !categories.contains(&&product.category) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns `true` if the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

fn eur(cents: i64) -> Price {
    Price::from_cents(cents, CurrencyCode::EUR)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn builtin_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new("1"),
            name: "SYMORA Posture Corrector Pro".to_string(),
            price: eur(2999),
            original_price: Some(eur(4999)),
            images: strings(&[
                "/posture-corrector.png",
                "https://images.pexels.com/photos/6975473/pexels-photo-6975473.jpeg",
                "https://images.pexels.com/photos/7203688/pexels-photo-7203688.jpeg",
                "https://images.pexels.com/photos/6740821/pexels-photo-6740821.jpeg",
            ]),
            description: "Revolutionary X-strap posture corrector designed to naturally align your spine and improve your daily posture habits with maximum comfort.".to_string(),
            benefits: strings(&[
                "Immediate posture improvement",
                "Reduces back and neck pain",
                "Comfortable all-day wear",
                "Adjustable fit for all body types",
                "Breathable premium materials",
                "Invisible under clothing",
            ]),
            category: CategoryId::new("posture"),
            is_on_sale: true,
            is_best_seller: true,
            is_new: false,
            is_limited_time: false,
        },
        Product {
            id: ProductId::new("2"),
            name: "SYMORA Neck Stretcher Elite".to_string(),
            price: eur(2999),
            original_price: Some(eur(3999)),
            images: strings(&[
                "https://images.pexels.com/photos/6975420/pexels-photo-6975420.jpeg",
                "https://images.pexels.com/photos/6975419/pexels-photo-6975419.jpeg",
                "https://images.pexels.com/photos/7203680/pexels-photo-7203680.jpeg",
            ]),
            description: "Advanced cervical traction device that provides gentle, effective neck pain relief and improved mobility for modern professionals.".to_string(),
            benefits: strings(&[
                "Relieves cervical tension",
                "Improves neck flexibility",
                "Professional-grade design",
                "Portable and lightweight",
                "Easy 10-minute sessions",
                "Clinically tested results",
            ]),
            category: CategoryId::new("recovery"),
            is_on_sale: true,
            is_best_seller: false,
            is_new: true,
            is_limited_time: false,
        },
        Product {
            id: ProductId::new("3"),
            name: "SYMORA Recovery Massage Tool".to_string(),
            price: eur(2999),
            original_price: Some(eur(4499)),
            images: strings(&[
                "https://images.pexels.com/photos/7203681/pexels-photo-7203681.jpeg",
                "https://images.pexels.com/photos/6740822/pexels-photo-6740822.jpeg",
                "https://images.pexels.com/photos/7203686/pexels-photo-7203686.jpeg",
            ]),
            description: "Precision-engineered massage tool for deep tissue therapy and muscle recovery optimization with ergonomic design.".to_string(),
            benefits: strings(&[
                "Deep muscle relief",
                "Accelerated recovery",
                "Ergonomic grip design",
                "Multiple pressure points",
                "Durable construction",
                "Travel-friendly size",
            ]),
            category: CategoryId::new("massage"),
            is_on_sale: true,
            is_best_seller: false,
            is_new: false,
            is_limited_time: false,
        },
        Product {
            id: ProductId::new("4"),
            name: "SYMORA Alignment Support".to_string(),
            price: eur(2999),
            original_price: Some(eur(4299)),
            images: strings(&[
                "https://images.pexels.com/photos/6975475/pexels-photo-6975475.jpeg",
                "https://images.pexels.com/photos/7203687/pexels-photo-7203687.jpeg",
                "https://images.pexels.com/photos/6740823/pexels-photo-6740823.jpeg",
            ]),
            description: "Complete spinal alignment system for comprehensive postural support and wellness enhancement throughout your day.".to_string(),
            benefits: strings(&[
                "Full spinal support",
                "Enhanced wellness",
                "Premium materials",
                "All-day comfort",
                "Discreet design",
                "Scientifically proven",
            ]),
            category: CategoryId::new("alignment"),
            is_on_sale: true,
            is_best_seller: false,
            is_new: false,
            is_limited_time: true,
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 4);
        // Builtin data passes the same validation as file catalogs
        assert!(Catalog::new(builtin_products(), CurrencyCode::EUR).is_ok());
    }

    #[test]
    fn test_builtin_matches_unconfigured_load() {
        let builtin = Catalog::builtin();
        let loaded = Catalog::load(None, CurrencyCode::EUR).unwrap();
        assert_eq!(builtin.currency(), loaded.currency());
        assert!(builtin.iter().map(|p| &p.id).eq(loaded.iter().map(|p| &p.id)));

        assert!(matches!(
            Catalog::load(None, CurrencyCode::USD),
            Err(CatalogError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_get_and_category_lookup() {
        let catalog = Catalog::builtin();
        let neck = catalog.get(&ProductId::new("2")).unwrap();
        assert_eq!(neck.name, "SYMORA Neck Stretcher Elite");

        let posture = CategoryId::new("posture");
        let in_category: Vec<_> = catalog.by_category(&posture).collect();
        assert_eq!(in_category.len(), 1);
        assert_eq!(in_category[0].id, ProductId::new("1"));

        assert!(catalog.get(&ProductId::new("99")).is_none());
    }

    #[test]
    fn test_categories_in_catalog_order() {
        let catalog = Catalog::builtin();
        let names: Vec<&str> = catalog
            .categories()
            .into_iter()
            .map(CategoryId::as_str)
            .collect();
        assert_eq!(names, ["posture", "recovery", "massage", "alignment"]);
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut products = builtin_products();
        products[1].id = ProductId::new("1");
        assert!(matches!(
            Catalog::new(products, CurrencyCode::EUR),
            Err(CatalogError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_rejects_currency_mismatch() {
        assert!(matches!(
            Catalog::load(None, CurrencyCode::USD),
            Err(CatalogError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let mut products = builtin_products();
        products[0].price = Price::zero(CurrencyCode::EUR);
        assert!(matches!(
            Catalog::new(products, CurrencyCode::EUR),
            Err(CatalogError::NonPositivePrice(_))
        ));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&builtin_products()[..2]).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let catalog = Catalog::from_json_file(file.path(), CurrencyCode::EUR).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get(&ProductId::new("2")).unwrap().original_price,
            Some(eur(3999))
        );
    }

    #[test]
    fn test_from_json_file_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        assert!(matches!(
            Catalog::from_json_file(file.path(), CurrencyCode::EUR),
            Err(CatalogError::Parse(_))
        ));
    }
}
