//! End-to-end checkout tests.
//!
//! Time is paused so the simulated delays resolve instantly while still
//! being measurable.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use chrono::TimeDelta;
use symora_core::{PaymentMethod, ProductId, TrackingStage};
use symora_integration_tests::{
    RecordingProvider, card_request, memory_session, session_with_provider, test_config, wallet_request,
};
use symora_storefront::AppError;
use symora_storefront::checkout::{CheckoutError, CheckoutPhase};
use symora_storefront::preferences::MemoryStore;
use tokio::time::Instant;

// =============================================================================
// Successful Checkout
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_card_checkout_places_order_and_clears_cart() {
    let mut session = memory_session();
    session.add_to_cart(&ProductId::new("1"), 2).unwrap();
    session.add_to_cart(&ProductId::new("3"), 1).unwrap();
    session.toggle_cart();
    let expected = session.order_summary().unwrap();

    let started = Instant::now();
    let outcome = session.checkout(&card_request("4242 4242 4242 4242")).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(8500));

    let order = &outcome.order;
    assert!(order.number.as_str().starts_with("SYMORA-"));
    assert_eq!(order.number.as_str().len(), "SYMORA-".len() + 6);
    assert_eq!(order.payment_method, PaymentMethod::Card);
    assert!(order.payment_token.as_ref().unwrap().as_str().starts_with("pm_"));
    assert_eq!(order.item_count(), 3);
    assert_eq!(order.summary, expected);

    assert_eq!(outcome.tracking.stage, TrackingStage::Processing);
    assert_eq!(
        outcome.tracking.estimated_delivery,
        (order.placed_at + TimeDelta::days(3)).date_naive()
    );

    assert!(session.cart().is_empty());
    assert!(!session.cart().is_open());
}

#[tokio::test(start_paused = true)]
async fn test_wallet_checkout_skips_card_step() {
    let mut session = session_with_provider(test_config(), MemoryStore::new(), RecordingProvider::default());
    session.add_to_cart(&ProductId::new("2"), 1).unwrap();

    let outcome = session.checkout(&wallet_request(PaymentMethod::GooglePay)).await.unwrap();
    assert!(outcome.order.payment_token.is_none());

    let phases: Vec<CheckoutPhase> = outcome.history.iter().map(|t| t.to).collect();
    assert_eq!(
        phases,
        [
            CheckoutPhase::SelectingMethod,
            CheckoutPhase::Processing,
            CheckoutPhase::Succeeded,
            CheckoutPhase::Tracking,
            CheckoutPhase::Tracking,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_card_checkout_uses_provider_once() {
    let mut session = session_with_provider(test_config(), MemoryStore::new(), RecordingProvider::default());
    session.add_to_cart(&ProductId::new("4"), 1).unwrap();

    let outcome = session.checkout(&card_request("5555555555554444")).await.unwrap();
    assert_eq!(outcome.order.payment_token.unwrap().as_str(), "pm_recorded_1");
}

#[tokio::test(start_paused = true)]
async fn test_applied_discount_reaches_order() {
    let mut session = memory_session();
    session.submit_coupon_email("emma@example.nl").unwrap();
    session.apply_discount("SAVE10").unwrap();
    session.add_to_cart(&ProductId::new("1"), 1).unwrap();

    let outcome = session.checkout(&wallet_request(PaymentMethod::PayPal)).await.unwrap();
    assert_eq!(outcome.order.summary.discount_code.as_deref(), Some("SAVE10"));
    assert!(outcome.order.summary.has_discount());
}

// =============================================================================
// Failed Checkout
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_empty_cart_is_rejected() {
    let mut session = memory_session();
    let err = session.checkout(&wallet_request(PaymentMethod::PayPal)).await.unwrap_err();
    assert!(matches!(err, AppError::EmptyCart));
    assert_eq!(err.user_message(), "Your cart is empty");
}

#[tokio::test(start_paused = true)]
async fn test_declined_card_keeps_cart_and_selection() {
    let mut session = memory_session();
    session.add_to_cart(&ProductId::new("1"), 1).unwrap();

    let err = session.checkout(&card_request("4000000000000002")).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Checkout(CheckoutError::PaymentFailed(_))
    ));
    assert_eq!(err.user_message(), "Your card was declined.");

    let flow = session.last_checkout().unwrap();
    assert_eq!(flow.phase(), CheckoutPhase::SelectingMethod);
    assert_eq!(flow.last_error(), Some("Your card was declined."));
    assert!(flow.history().iter().all(|t| t.to != CheckoutPhase::Processing));
    assert_eq!(session.cart().item_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_missing_fields_never_reach_provider() {
    let provider = RecordingProvider::default();
    let mut session = session_with_provider(test_config(), MemoryStore::new(), &provider);
    session.add_to_cart(&ProductId::new("1"), 1).unwrap();

    let mut request = card_request("4242424242424242");
    request.form.postal_code = String::new();

    let err = session.checkout(&request).await.unwrap_err();
    assert_eq!(err.user_message(), "Please fill in all required fields.");
    assert_eq!(session.cart().item_count(), 1);
    assert!(provider.calls().is_empty());

    // Fixing the form goes through on the same session
    request.form.postal_code = "1015 CJ".to_string();
    session.checkout(&request).await.unwrap();
    assert_eq!(provider.calls(), ["4242"]);
}

#[tokio::test(start_paused = true)]
async fn test_apple_pay_requires_configuration() {
    let mut session = memory_session();
    session.add_to_cart(&ProductId::new("1"), 1).unwrap();
    let err = session.checkout(&wallet_request(PaymentMethod::ApplePay)).await.unwrap_err();
    assert_eq!(err.user_message(), "Apple Pay is not available");

    let mut config = test_config();
    config.payment.apple_pay_available = true;
    let mut session = session_with_provider(config, MemoryStore::new(), RecordingProvider::default());
    session.add_to_cart(&ProductId::new("1"), 1).unwrap();
    let outcome = session.checkout(&wallet_request(PaymentMethod::ApplePay)).await.unwrap();
    assert_eq!(outcome.order.payment_method, PaymentMethod::ApplePay);
}
