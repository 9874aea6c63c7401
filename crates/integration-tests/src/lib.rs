//! Integration tests for the SYMORA storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p symora-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_session` - Catalog, cart and promotions through a session
//! - `checkout_flow` - Simulated checkout end to end, with paused time
//! - `preferences_persistence` - File-backed preferences across sessions
//!
//! Shared fixtures live here so each test file builds sessions the same way.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use symora_core::PaymentMethod;
use symora_storefront::StorefrontSession;
use symora_storefront::catalog::Catalog;
use symora_storefront::checkout::{CheckoutForm, CheckoutRequest};
use symora_storefront::config::{CheckoutTimings, StorefrontConfig};
use symora_storefront::payment::{
    BillingDetails, CardDetails, PaymentError, PaymentMethodToken, PaymentProvider, SimulatedPaymentProvider,
};
use symora_storefront::preferences::{FileStore, KeyValueStore, MemoryStore, StorageError};

/// Publishable test key used by every fixture.
pub const TEST_PUBLISHABLE_KEY: &str = "pk_test_symora_integration";

/// Default configuration with the test key and real checkout delays.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    match StorefrontConfig::with_publishable_key(TEST_PUBLISHABLE_KEY) {
        Ok(config) => config,
        Err(e) => unreachable!("test key rejected: {e}"),
    }
}

/// Session over an in-memory store and the simulated provider.
#[must_use]
pub fn memory_session() -> StorefrontSession<MemoryStore, SimulatedPaymentProvider> {
    session_with(test_config(), MemoryStore::new())
}

/// Session over a preferences file.
///
/// # Errors
///
/// Returns a [`StorageError`] if the file exists but cannot be read.
pub fn file_session(
    path: &Path,
) -> Result<StorefrontSession<FileStore, SimulatedPaymentProvider>, StorageError> {
    let mut config = test_config();
    config.checkout = CheckoutTimings::instant();
    config.preferences_path = path.to_path_buf();
    Ok(session_with(config, FileStore::open(path)?))
}

/// Session over any store with the given configuration.
#[must_use]
pub fn session_with<S: KeyValueStore>(
    config: StorefrontConfig,
    store: S,
) -> StorefrontSession<S, SimulatedPaymentProvider> {
    let provider = SimulatedPaymentProvider::new(&config.payment);
    session_with_provider(config, store, provider)
}

/// Session over any store and payment provider.
#[must_use]
pub fn session_with_provider<S: KeyValueStore, P: PaymentProvider>(
    config: StorefrontConfig,
    store: S,
    provider: P,
) -> StorefrontSession<S, P> {
    StorefrontSession::new(&config, Catalog::builtin(), store, provider)
}

/// A complete Dutch shipping form.
#[must_use]
pub fn filled_form() -> CheckoutForm {
    CheckoutForm {
        email: "emma@example.nl".to_string(),
        name: "Emma de Jong".to_string(),
        address: "Keizersgracht 1".to_string(),
        city: "Amsterdam".to_string(),
        postal_code: "1015 CJ".to_string(),
        ..CheckoutForm::default()
    }
}

/// Card details with a far-future expiry.
#[must_use]
pub fn card(number: &str) -> CardDetails {
    CardDetails {
        number: number.to_string(),
        exp_month: 12,
        exp_year: 2099,
        cvc: "123".to_string(),
    }
}

/// Card checkout request with a filled form.
#[must_use]
pub fn card_request(number: &str) -> CheckoutRequest {
    CheckoutRequest {
        method: PaymentMethod::Card,
        form: filled_form(),
        card: Some(card(number)),
    }
}

/// Wallet checkout request; no form or card needed.
#[must_use]
pub fn wallet_request(method: PaymentMethod) -> CheckoutRequest {
    CheckoutRequest {
        method,
        ..CheckoutRequest::default()
    }
}

/// Provider that records every call and issues sequential tokens.
#[derive(Debug, Default)]
pub struct RecordingProvider {
    calls: Mutex<Vec<String>>,
}

impl RecordingProvider {
    /// Last four digits of every card seen, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl PaymentProvider for RecordingProvider {
    async fn create_payment_method(
        &self,
        card: &CardDetails,
        _billing: &BillingDetails,
    ) -> Result<PaymentMethodToken, PaymentError> {
        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        calls.push(card.last4());
        Ok(PaymentMethodToken::new(format!("pm_recorded_{}", calls.len())))
    }
}

#[async_trait]
impl<'a> PaymentProvider for &'a RecordingProvider {
    async fn create_payment_method(
        &self,
        card: &CardDetails,
        billing: &BillingDetails,
    ) -> Result<PaymentMethodToken, PaymentError> {
        (**self).create_payment_method(card, billing).await
    }
}
