//! Catalog browsing commands.

use serde::Serialize;
use symora_core::{CategoryId, Product, ProductId};
use symora_storefront::AppError;
use symora_storefront::catalog::Catalog;
use symora_storefront::promotions::BundleOffer;

/// Product listing row.
#[derive(Debug, Serialize)]
struct ProductRow<'a> {
    #[serde(flatten)]
    product: &'a Product,
    discount_percentage: Option<u32>,
}

impl<'a> From<&'a Product> for ProductRow<'a> {
    fn from(product: &'a Product) -> Self {
        Self {
            product,
            discount_percentage: product.discount_percentage(),
        }
    }
}

/// List products, optionally restricted to one category.
///
/// # Errors
///
/// Returns an error if the category is unknown or JSON output fails.
pub fn list(catalog: &Catalog, category: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let category = category.map(|name| CategoryId::new(name.trim().to_ascii_lowercase()));
    if let Some(category) = &category
        && !catalog.categories().contains(&category)
    {
        let known: Vec<&str> = catalog.categories().into_iter().map(CategoryId::as_str).collect();
        return Err(AppError::NotFound(format!("category {category} (known: {})", known.join(", "))).into());
    }

    let products: Vec<&Product> = match &category {
        Some(category) => catalog.by_category(category).map(|product| &**product).collect(),
        None => catalog.iter().map(|product| &**product).collect(),
    };

    if json {
        let rows: Vec<ProductRow<'_>> = products.into_iter().map(ProductRow::from).collect();
        super::print_json(&rows)?;
        return Ok(());
    }

    for product in products {
        let was = product
            .original_price
            .filter(|_| product.savings().is_some())
            .map(|original| format!(" (was {original})"))
            .unwrap_or_default();
        let off = product
            .discount_percentage()
            .map(|percent| format!(" -{percent}%"))
            .unwrap_or_default();
        println!(
            "{:>3}  {:<28} {}{was}{off}  [{}]{}",
            product.id,
            product.name,
            product.price,
            product.category,
            badges(product)
        );
    }
    Ok(())
}

/// Show a single product with its bundle offer.
///
/// # Errors
///
/// Returns an error if the product does not exist or JSON output fails.
pub fn show(catalog: &Catalog, id: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let product_id = ProductId::new(id.trim());
    let product = catalog
        .get(&product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;
    let bundle = BundleOffer::for_price(product.price);

    if json {
        #[derive(Serialize)]
        struct ProductDetail<'a> {
            #[serde(flatten)]
            row: ProductRow<'a>,
            bundle: BundleOffer,
        }
        super::print_json(&ProductDetail {
            row: ProductRow::from(&**product),
            bundle,
        })?;
        return Ok(());
    }

    println!("{}{}", product.name, badges(product));
    println!("{}", product.price);
    if let (Some(original), Some(percent)) = (product.original_price, product.discount_percentage()) {
        println!("Was {original}, save {percent}%");
    }
    println!();
    println!("{}", product.description);
    for benefit in &product.benefits {
        println!("  - {benefit}");
    }
    println!();
    println!(
        "Bundle: {} for {} (regular {}, save {} / {}%)",
        bundle.quantity, bundle.bundle_price, bundle.regular_price, bundle.savings, bundle.savings_percentage
    );
    Ok(())
}

fn badges(product: &Product) -> String {
    let labels = [
        (product.is_best_seller, "best seller"),
        (product.is_new, "new"),
        (product.is_on_sale, "sale"),
        (product.is_limited_time, "limited time"),
    ];
    let active: Vec<&str> = labels
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, label)| *label)
        .collect();
    if active.is_empty() {
        String::new()
    } else {
        format!("  <{}>", active.join(", "))
    }
}
