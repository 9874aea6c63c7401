//! Customer preferences kept in local storage.
//!
//! Four plain string keys, no schema versioning:
//! - popup-seen flag (`"true"` once the coupon offer was shown)
//! - captured email
//! - discount code issued for the captured email
//! - discount-applied flag
//!
//! [`Preferences`] is the typed view over any [`KeyValueStore`].

mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore, StorageError};

use serde::Serialize;
use symora_core::Email;

/// Storage keys.
pub mod keys {
    /// Set to `"true"` once the coupon popup has been shown or dismissed.
    pub const COUPON_POPUP_SEEN: &str = "symora-coupon-popup-seen";

    /// Email captured by the coupon popup.
    pub const USER_EMAIL: &str = "symora-user-email";

    /// Discount code issued for the captured email.
    pub const DISCOUNT_CODE: &str = "symora-discount-code";

    /// Set to `"true"` once the customer applied their discount code.
    pub const DISCOUNT_APPLIED: &str = "symora-discount-applied";

    /// Every key the storefront writes.
    pub const ALL: [&str; 4] = [COUPON_POPUP_SEEN, USER_EMAIL, DISCOUNT_CODE, DISCOUNT_APPLIED];
}

const TRUE: &str = "true";

/// Snapshot of all stored preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreferencesSnapshot {
    pub coupon_popup_seen: bool,
    pub user_email: Option<String>,
    pub discount_code: Option<String>,
    pub discount_applied: bool,
}

/// Typed access to the storefront's local-storage keys.
#[derive(Debug)]
pub struct Preferences<S> {
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    /// Wrap a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Whether the coupon popup has already been shown.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store is unavailable.
    pub fn coupon_popup_seen(&self) -> Result<bool, StorageError> {
        self.flag(keys::COUPON_POPUP_SEEN)
    }

    /// Record that the coupon popup was shown.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store is unavailable.
    pub fn mark_coupon_popup_seen(&mut self) -> Result<(), StorageError> {
        self.store.set(keys::COUPON_POPUP_SEEN, TRUE)
    }

    /// The captured email, if one is stored and still parses.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store is unavailable.
    pub fn user_email(&self) -> Result<Option<Email>, StorageError> {
        let Some(raw) = self.store.get(keys::USER_EMAIL)? else {
            return Ok(None);
        };
        match Email::parse(&raw) {
            Ok(email) => Ok(Some(email)),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring invalid stored email");
                Ok(None)
            }
        }
    }

    /// Store the captured email.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store is unavailable.
    pub fn set_user_email(&mut self, email: &Email) -> Result<(), StorageError> {
        self.store.set(keys::USER_EMAIL, email.as_str())
    }

    /// The issued discount code, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store is unavailable.
    pub fn discount_code(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .store
            .get(keys::DISCOUNT_CODE)?
            .filter(|code| !code.trim().is_empty()))
    }

    /// Store an issued discount code.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store is unavailable.
    pub fn set_discount_code(&mut self, code: &str) -> Result<(), StorageError> {
        self.store.set(keys::DISCOUNT_CODE, code)
    }

    /// Whether the customer applied their discount code.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store is unavailable.
    pub fn discount_applied(&self) -> Result<bool, StorageError> {
        self.flag(keys::DISCOUNT_APPLIED)
    }

    /// Set or clear the discount-applied flag.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store is unavailable.
    pub fn set_discount_applied(&mut self, applied: bool) -> Result<(), StorageError> {
        if applied {
            self.store.set(keys::DISCOUNT_APPLIED, TRUE)
        } else {
            self.store.remove(keys::DISCOUNT_APPLIED)
        }
    }

    /// Read every key at once.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store is unavailable.
    pub fn snapshot(&self) -> Result<PreferencesSnapshot, StorageError> {
        Ok(PreferencesSnapshot {
            coupon_popup_seen: self.coupon_popup_seen()?,
            user_email: self.user_email()?.map(Email::into_inner),
            discount_code: self.discount_code()?,
            discount_applied: self.discount_applied()?,
        })
    }

    /// Remove every storefront key.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store is unavailable.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        for key in keys::ALL {
            self.store.remove(key)?;
        }
        tracing::info!("Preferences reset");
        Ok(())
    }

    /// Borrow the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    fn flag(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.store.get(key)?.is_some_and(|value| value == TRUE))
    }
}
