//! Integration tests for file-backed preferences across sessions.

#![allow(clippy::unwrap_used)]

use symora_core::{PaymentMethod, ProductId};
use symora_integration_tests::{file_session, wallet_request};
use symora_storefront::preferences::{KeyValueStore, keys};
use symora_storefront::promotions::CouponOffer;

#[tokio::test(start_paused = true)]
async fn test_coupon_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("symora").join("preferences.json");

    {
        let mut session = file_session(&path).unwrap();
        tokio::time::advance(CouponOffer::SHOW_AFTER).await;
        assert!(session.should_offer_coupon().unwrap());
        session.submit_coupon_email("lucas@example.de").unwrap();
    }

    let mut session = file_session(&path).unwrap();
    tokio::time::advance(CouponOffer::SHOW_AFTER).await;
    assert!(!session.should_offer_coupon().unwrap());
    session.apply_discount("SAVE10").unwrap();

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[keys::COUPON_POPUP_SEEN], "true");
    assert_eq!(raw[keys::USER_EMAIL], "lucas@example.de");
    assert_eq!(raw[keys::DISCOUNT_CODE], "SAVE10");
    assert_eq!(raw[keys::DISCOUNT_APPLIED], "true");
}

#[test]
fn test_dismiss_only_records_seen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");

    file_session(&path).unwrap().dismiss_coupon().unwrap();

    let session = file_session(&path).unwrap();
    let store = session.preferences().store();
    assert_eq!(store.get(keys::COUPON_POPUP_SEEN).unwrap().as_deref(), Some("true"));
    assert_eq!(store.get(keys::USER_EMAIL).unwrap(), None);
    assert_eq!(store.get(keys::DISCOUNT_CODE).unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_reset_clears_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");

    let mut session = file_session(&path).unwrap();
    session.submit_coupon_email("lucas@example.de").unwrap();
    session.preferences_mut().reset().unwrap();

    let reopened = file_session(&path).unwrap();
    tokio::time::advance(CouponOffer::SHOW_AFTER).await;
    assert!(reopened.should_offer_coupon().unwrap());
    assert_eq!(reopened.preferences().snapshot().unwrap(), Default::default());
}

#[test]
fn test_corrupt_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    std::fs::write(&path, "not json").unwrap();

    assert!(file_session(&path).is_err());
}

#[tokio::test]
async fn test_discount_persists_after_checkout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");

    let mut session = file_session(&path).unwrap();
    session.submit_coupon_email("lucas@example.de").unwrap();
    session.apply_discount("SAVE10").unwrap();
    session.add_to_cart(&ProductId::new("2"), 1).unwrap();
    session.checkout(&wallet_request(PaymentMethod::PayPal)).await.unwrap();

    let reopened = file_session(&path).unwrap();
    assert!(reopened.active_discount().unwrap().is_some());
    assert!(reopened.cart().is_empty());
}

#[test]
fn test_failed_discount_write_is_not_applied() {
    let dir = tempfile::tempdir().unwrap();
    let parent = dir.path().join("prefs");
    let path = parent.join("preferences.json");

    let mut session = file_session(&path).unwrap();
    session.submit_coupon_email("lucas@example.de").unwrap();
    session.add_to_cart(&ProductId::new("1"), 2).unwrap();

    std::fs::remove_dir_all(&parent).unwrap();
    std::fs::write(&parent, "").unwrap();

    let err = session.apply_discount("SAVE10").unwrap_err();
    assert!(err.is_internal());
    assert!(session.active_discount().unwrap().is_none());
    assert!(!session.order_summary().unwrap().has_discount());
}
