//! Shopping cart state container.
//!
//! The cart is an insertion-ordered list of line items plus an open/closed
//! flag. The total is never stored: [`Cart::total`] recomputes it from the
//! items on every read, so it cannot drift from the lines.
//!
//! None of the operations fail. Removing or updating a product that is not in
//! the cart is a no-op, and a line is dropped as soon as its quantity would
//! fall to zero or below.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use symora_core::{CurrencyCode, Price, Product, ProductId};

/// A (product, quantity) pair inside the cart. Quantity is always at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    product: Arc<Product>,
    quantity: u32,
}

impl CartItem {
    /// The product on this line.
    #[must_use]
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Quantity on this line (always >= 1).
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// The shopping cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    currency: CurrencyCode,
    items: Vec<CartItem>,
    is_open: bool,
}

impl Cart {
    /// Create an empty, closed cart in the store currency.
    #[must_use]
    pub const fn new(currency: CurrencyCode) -> Self {
        Self {
            currency,
            items: Vec::new(),
            is_open: false,
        }
    }

    /// Add `quantity` units of a product.
    ///
    /// Merges into the existing line for the product by summing quantities,
    /// otherwise appends a new line. A quantity of 0 is ignored, and so is a
    /// product priced in another currency.
    pub fn add(&mut self, product: &Arc<Product>, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if product.price.currency_code != self.currency {
            tracing::warn!(
                product_id = %product.id,
                currency = %product.price.currency_code,
                cart_currency = %self.currency,
                "Ignoring product priced in a different currency"
            );
            return;
        }

        if let Some(item) = self.find_mut(&product.id) {
            item.quantity = item.quantity.saturating_add(quantity);
            tracing::debug!(product_id = %product.id, quantity = item.quantity, "Merged cart line");
        } else {
            self.items.push(CartItem {
                product: Arc::clone(product),
                quantity,
            });
            tracing::debug!(product_id = %product.id, quantity, "Appended cart line");
        }
    }

    /// Remove the line for a product. No-op if absent.
    pub fn remove(&mut self, product_id: &ProductId) {
        let before = self.items.len();
        self.items.retain(|item| &item.product.id != product_id);
        if self.items.len() != before {
            tracing::debug!(product_id = %product_id, "Removed cart line");
        }
    }

    /// Replace the quantity of a line, removing it when `quantity <= 0`.
    /// No-op if the product is not in the cart.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }
        if let Some(item) = self.find_mut(product_id) {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            tracing::debug!(product_id = %product_id, quantity = item.quantity, "Updated cart line");
        }
    }

    /// Empty the cart. The open/closed flag is left alone.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Flip the open/closed flag.
    pub fn toggle_visibility(&mut self) {
        self.is_open = !self.is_open;
    }

    /// Whether the cart panel is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Line for a product, if present.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.product.id == product_id)
    }

    /// Sum of price × quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        let amount: Decimal = self
            .items
            .iter()
            .map(|item| item.line_total().amount)
            .sum();
        Price::new(amount, self.currency)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, item| count.saturating_add(item.quantity))
    }

    /// Returns `true` if there are no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cart currency.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    fn find_mut(&mut self, product_id: &ProductId) -> Option<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|item| &item.product.id == product_id)
    }
}

/// Cart item display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: Option<String>,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
    pub is_open: bool,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product.id.to_string(),
            name: item.product.name.clone(),
            quantity: item.quantity,
            price: item.product.price.display(),
            line_price: item.line_total().display(),
            image: item.product.primary_image().map(str::to_string),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items.iter().map(CartItemView::from).collect(),
            subtotal: cart.total().display(),
            item_count: cart.item_count(),
            is_open: cart.is_open,
        }
    }
}
