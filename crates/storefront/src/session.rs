//! A customer's storefront session.
//!
//! Ties the catalog, the cart, stored preferences and the checkout simulator
//! together. Everything here runs on a single logical thread; the only
//! suspension points are the checkout delays.

use symora_core::{Email, ProductId};
use tokio::time::Instant;
use tracing::instrument;

use crate::cart::{Cart, CartItem};
use crate::catalog::Catalog;
use crate::checkout::{CheckoutFlow, CheckoutOutcome, CheckoutRequest, CheckoutSimulator, OrderDraft};
use crate::config::{PricingConfig, StorefrontConfig};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::payment::PaymentProvider;
use crate::preferences::{KeyValueStore, Preferences};
use crate::pricing::OrderSummary;
use crate::promotions::{self, BundleOffer, CouponOffer, DiscountCode, FreeShippingProgress};

/// A storefront session.
#[derive(Debug)]
pub struct StorefrontSession<S, P> {
    catalog: Catalog,
    cart: Cart,
    preferences: Preferences<S>,
    pricing: PricingConfig,
    simulator: CheckoutSimulator<P>,
    last_checkout: Option<CheckoutFlow>,
    started_at: Instant,
}

impl<S: KeyValueStore, P: PaymentProvider> StorefrontSession<S, P> {
    /// Start a session with an empty, closed cart.
    #[must_use]
    pub fn new(config: &StorefrontConfig, catalog: Catalog, store: S, provider: P) -> Self {
        let simulator = CheckoutSimulator::new(provider, config.checkout, config.payment.apple_pay_available);
        Self {
            cart: Cart::new(catalog.currency()),
            catalog,
            preferences: Preferences::new(store),
            pricing: config.pricing,
            simulator,
            last_checkout: None,
            started_at: Instant::now(),
        }
    }

    /// The product catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Stored preferences.
    #[must_use]
    pub const fn preferences(&self) -> &Preferences<S> {
        &self.preferences
    }

    /// Stored preferences, mutably.
    pub const fn preferences_mut(&mut self) -> &mut Preferences<S> {
        &mut self.preferences
    }

    /// The flow of the most recent checkout attempt.
    #[must_use]
    pub const fn last_checkout(&self) -> Option<&CheckoutFlow> {
        self.last_checkout.as_ref()
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product is not in the catalog.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn add_to_cart(&mut self, product_id: &ProductId, quantity: u32) -> Result<Option<&CartItem>> {
        let product = self
            .catalog
            .get(product_id)
            .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

        self.cart.add(product, quantity);
        let data: &[(&str, &str)] = &[("product_id", product_id.as_str())];
        add_breadcrumb("cart", "Added to cart", Some(data));
        Ok(self.cart.get(product_id))
    }

    /// Add the two-unit bundle for a product and return its pricing.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product is not in the catalog.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn add_bundle(&mut self, product_id: &ProductId) -> Result<BundleOffer> {
        let price = self
            .catalog
            .get(product_id)
            .map(|product| product.price)
            .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

        self.add_to_cart(product_id, BundleOffer::QUANTITY)?;
        Ok(BundleOffer::for_price(price))
    }

    /// Remove a product from the cart. No-op if absent.
    pub fn remove_from_cart(&mut self, product_id: &ProductId) {
        self.cart.remove(product_id);
    }

    /// Replace a line's quantity; zero or less removes it.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        self.cart.set_quantity(product_id, quantity);
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Open or close the cart panel.
    pub fn toggle_cart(&mut self) {
        self.cart.toggle_visibility();
    }

    // =========================================================================
    // Pricing & Promotions
    // =========================================================================

    /// The discount currently applied, if any.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if preferences cannot be read.
    pub fn active_discount(&self) -> Result<Option<DiscountCode>> {
        Ok(promotions::active_discount(&self.preferences)?)
    }

    /// Subtotal, discount, shipping, tax and total for the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if preferences cannot be read.
    pub fn order_summary(&self) -> Result<OrderSummary> {
        let discount = self.active_discount()?;
        Ok(OrderSummary::compute(self.cart.total(), &self.pricing, discount.as_ref()))
    }

    /// Progress towards free shipping.
    #[must_use]
    pub fn free_shipping_progress(&self) -> FreeShippingProgress {
        FreeShippingProgress::new(self.cart.total(), self.pricing.free_shipping_threshold)
    }

    /// Whether to show the coupon offer. It is held back until
    /// [`CouponOffer::SHOW_AFTER`] has passed since the session started.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if preferences cannot be read.
    pub fn should_offer_coupon(&self) -> Result<bool> {
        Ok(CouponOffer::should_offer(&self.preferences, self.started_at.elapsed())?)
    }

    /// Capture an email from the coupon offer and issue the welcome code.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for an invalid email, or
    /// `AppError::Promotion` if preferences cannot be written.
    #[instrument(skip(self, email))]
    pub fn submit_coupon_email(&mut self, email: &str) -> Result<DiscountCode> {
        let email = Email::parse(email).map_err(|e| AppError::BadRequest(e.to_string()))?;
        Ok(CouponOffer::submit(&mut self.preferences, &email)?)
    }

    /// Close the coupon offer without an email.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` if preferences cannot be written.
    pub fn dismiss_coupon(&mut self) -> Result<()> {
        Ok(CouponOffer::dismiss(&mut self.preferences)?)
    }

    /// Apply an entered discount code.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Promotion` if the code is not the one issued to
    /// this customer.
    #[instrument(skip(self))]
    pub fn apply_discount(&mut self, code: &str) -> Result<DiscountCode> {
        Ok(promotions::apply_discount_code(&mut self.preferences, code)?)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Run the simulated checkout for the current cart.
    ///
    /// On success the cart is cleared and closed. On failure the cart is
    /// left untouched and the flow stays available via
    /// [`StorefrontSession::last_checkout`].
    ///
    /// # Errors
    ///
    /// Returns `AppError::EmptyCart` if there is nothing to buy, or
    /// `AppError::Checkout` if validation, payment or the flow fails.
    #[instrument(skip(self, request), fields(method = %request.method, items = self.cart.item_count()))]
    pub async fn checkout(&mut self, request: &CheckoutRequest) -> Result<CheckoutOutcome> {
        if self.cart.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let draft = OrderDraft::from_cart(&self.cart, self.order_summary()?);
        let mut flow = self.simulator.start();
        let result = self.simulator.run(&mut flow, draft, request).await;
        self.last_checkout = Some(flow);

        let outcome = result?;
        self.cart.clear();
        if self.cart.is_open() {
            self.cart.toggle_visibility();
        }
        tracing::info!(order_number = %outcome.order.number, "Checkout complete");
        Ok(outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use symora_core::{CurrencyCode, PaymentMethod, Price};

    use super::*;
    use crate::config::CheckoutTimings;
    use crate::payment::SimulatedPaymentProvider;
    use crate::preferences::MemoryStore;

    fn session() -> StorefrontSession<MemoryStore, SimulatedPaymentProvider> {
        let mut config = StorefrontConfig::with_publishable_key("pk_test_symora").unwrap();
        config.checkout = CheckoutTimings::instant();
        let provider = SimulatedPaymentProvider::new(&config.payment);
        StorefrontSession::new(&config, Catalog::builtin(), MemoryStore::new(), provider)
    }

    fn wallet(method: PaymentMethod) -> CheckoutRequest {
        CheckoutRequest {
            method,
            ..CheckoutRequest::default()
        }
    }

    #[test]
    fn test_add_unknown_product() {
        let mut session = session();
        let err = session.add_to_cart(&ProductId::new("99"), 1).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_add_to_cart_merges() {
        let mut session = session();
        let id = ProductId::new("2");
        session.add_to_cart(&id, 1).unwrap();
        let item = session.add_to_cart(&id, 2).unwrap().unwrap();
        assert_eq!(item.quantity(), 3);
    }

    #[test]
    fn test_add_bundle() {
        let mut session = session();
        let offer = session.add_bundle(&ProductId::new("3")).unwrap();
        assert_eq!(offer.quantity, 2);
        assert_eq!(offer.bundle_price, Price::from_cents(5098, CurrencyCode::EUR));
        assert_eq!(session.cart().item_count(), 2);
    }

    #[test]
    fn test_summary_uses_applied_discount() {
        let mut session = session();
        session.add_to_cart(&ProductId::new("1"), 2).unwrap();
        assert!(!session.order_summary().unwrap().has_discount());

        session.submit_coupon_email("noah@example.de").unwrap();
        assert!(!session.order_summary().unwrap().has_discount());

        session.apply_discount("SAVE10").unwrap();
        let summary = session.order_summary().unwrap();
        assert_eq!(summary.discount, Price::from_cents(600, CurrencyCode::EUR));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_coupon_email() {
        let mut session = session();
        assert!(matches!(
            session.submit_coupon_email("not-an-email"),
            Err(AppError::BadRequest(_))
        ));
        tokio::time::advance(CouponOffer::SHOW_AFTER).await;
        assert!(session.should_offer_coupon().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_coupon_offer_waits_for_delay() {
        let session = session();
        assert!(!session.should_offer_coupon().unwrap());

        tokio::time::advance(Duration::from_millis(4999)).await;
        assert!(!session.should_offer_coupon().unwrap());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(session.should_offer_coupon().unwrap());
    }

    #[test]
    fn test_free_shipping_progress_follows_cart() {
        let mut session = session();
        session.add_to_cart(&ProductId::new("1"), 1).unwrap();
        assert!(!session.free_shipping_progress().qualifies());
        session.add_to_cart(&ProductId::new("4"), 2).unwrap();
        assert!(session.free_shipping_progress().qualifies());
    }

    #[tokio::test]
    async fn test_checkout_empty_cart() {
        let mut session = session();
        let err = session.checkout(&wallet(PaymentMethod::PayPal)).await.unwrap_err();
        assert!(matches!(err, AppError::EmptyCart));
        assert!(session.last_checkout().is_none());
    }

    #[tokio::test]
    async fn test_checkout_clears_and_closes_cart() {
        let mut session = session();
        session.add_to_cart(&ProductId::new("1"), 1).unwrap();
        session.toggle_cart();

        let outcome = session.checkout(&wallet(PaymentMethod::GooglePay)).await.unwrap();
        assert_eq!(outcome.order.lines.len(), 1);
        assert!(session.cart().is_empty());
        assert!(!session.cart().is_open());
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_cart() {
        let mut session = session();
        session.add_to_cart(&ProductId::new("1"), 1).unwrap();

        let err = session.checkout(&wallet(PaymentMethod::Card)).await.unwrap_err();
        assert_eq!(err.user_message(), "Please fill in all required fields.");
        assert_eq!(session.cart().item_count(), 1);
        assert_eq!(
            session.last_checkout().unwrap().last_error(),
            Some("Please fill in all required fields.")
        );
    }
}
