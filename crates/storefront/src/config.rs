//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SYMORA_PAYMENT_PUBLISHABLE_KEY` - Payment provider publishable key (`pk_test_...` or `pk_live_...`)
//!
//! ## Optional
//! - `SYMORA_CURRENCY` - Store currency (default: EUR)
//! - `SYMORA_VAT_RATE` - VAT rate applied at checkout (default: 0.21)
//! - `SYMORA_FREE_SHIPPING_THRESHOLD` - Free shipping threshold (default: 60)
//! - `SYMORA_PREFERENCES_PATH` - Preferences file (default: .symora/preferences.json)
//! - `SYMORA_CATALOG_PATH` - JSON catalog file replacing the built-in products
//! - `SYMORA_APPLE_PAY_AVAILABLE` - Offer Apple Pay (default: false)
//! - `SYMORA_CHECKOUT_PROCESSING_MS` - Simulated processing delay (default: 2000)
//! - `SYMORA_CHECKOUT_SUCCESS_MS` - Success screen duration (default: 3000)
//! - `SYMORA_CARD_CONFIRM_MS` - Card confirmation delay (default: 1500)
//! - `SYMORA_TRACKING_ADVANCE_MS` - Delay before tracking advances (default: 2000)
//! - `SYMORA_LOG_FORMAT` - `json` for JSON logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use symora_core::CurrencyCode;
use thiserror::Error;

const PUBLISHABLE_KEY_PREFIXES: &[&str] = &["pk_test_", "pk_live_"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Currency every catalog price and cart total is expressed in
    pub currency: CurrencyCode,
    /// Checkout pricing rules
    pub pricing: PricingConfig,
    /// Payment provider configuration
    pub payment: PaymentConfig,
    /// Simulated checkout delays
    pub checkout: CheckoutTimings,
    /// Local preferences file (the local-storage analog)
    pub preferences_path: PathBuf,
    /// Optional JSON catalog replacing the built-in products
    pub catalog_path: Option<PathBuf>,
    /// Emit JSON logs instead of text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Pricing rules applied to the order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingConfig {
    /// VAT rate as a fraction (0.21 = 21%)
    pub vat_rate: Decimal,
    /// Cart total at which shipping becomes free
    pub free_shipping_threshold: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            vat_rate: Decimal::new(21, 2),
            free_shipping_threshold: Decimal::from(60),
        }
    }
}

/// Payment provider configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfig {
    /// Publishable key handed to the provider client (safe to expose)
    pub publishable_key: String,
    /// Whether Apple Pay is offered on this platform
    pub apple_pay_available: bool,
}

impl PaymentConfig {
    /// Create a payment configuration, validating the key format.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the key is not a publishable key.
    pub fn new(publishable_key: impl Into<String>, apple_pay_available: bool) -> Result<Self, ConfigError> {
        let publishable_key = publishable_key.into();
        validate_publishable_key(&publishable_key, "SYMORA_PAYMENT_PUBLISHABLE_KEY")?;
        Ok(Self {
            publishable_key,
            apple_pay_available,
        })
    }
}

/// Delays standing in for network latency in the simulated checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutTimings {
    /// Time spent in `Processing` before success
    pub processing: Duration,
    /// Time the success screen is shown before tracking
    pub success_display: Duration,
    /// Delay between "Payment succeeded!" and success for card payments
    pub card_confirm: Duration,
    /// Delay before tracking advances past `Confirmed`
    pub tracking_advance: Duration,
}

impl CheckoutTimings {
    /// No delays at all; useful for scripted sessions.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            processing: Duration::ZERO,
            success_display: Duration::ZERO,
            card_confirm: Duration::ZERO,
            tracking_advance: Duration::ZERO,
        }
    }
}

impl Default for CheckoutTimings {
    fn default() -> Self {
        Self {
            processing: Duration::from_millis(2000),
            success_display: Duration::from_millis(3000),
            card_confirm: Duration::from_millis(1500),
            tracking_advance: Duration::from_millis(2000),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let currency = parse_env_or_default("SYMORA_CURRENCY", CurrencyCode::EUR)?;
        let defaults = PricingConfig::default();
        let pricing = PricingConfig {
            vat_rate: parse_env_or_default("SYMORA_VAT_RATE", defaults.vat_rate)?,
            free_shipping_threshold: parse_env_or_default(
                "SYMORA_FREE_SHIPPING_THRESHOLD",
                defaults.free_shipping_threshold,
            )?,
        };
        validate_vat_rate(pricing.vat_rate)?;

        let payment = PaymentConfig::new(
            get_required_env("SYMORA_PAYMENT_PUBLISHABLE_KEY")?,
            parse_env_or_default("SYMORA_APPLE_PAY_AVAILABLE", false)?,
        )?;

        let checkout = CheckoutTimings::from_env()?;
        let preferences_path = PathBuf::from(get_env_or_default(
            "SYMORA_PREFERENCES_PATH",
            ".symora/preferences.json",
        ));
        let catalog_path = get_optional_env("SYMORA_CATALOG_PATH").map(PathBuf::from);
        let log_json = get_optional_env("SYMORA_LOG_FORMAT")
            .is_some_and(|format| format.eq_ignore_ascii_case("json"));

        Ok(Self {
            currency,
            pricing,
            payment,
            checkout,
            preferences_path,
            catalog_path,
            log_json,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration with defaults and the given publishable key, without
    /// reading the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the publishable key is malformed.
    pub fn with_publishable_key(publishable_key: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            currency: CurrencyCode::EUR,
            pricing: PricingConfig::default(),
            payment: PaymentConfig::new(publishable_key, false)?,
            checkout: CheckoutTimings::default(),
            preferences_path: PathBuf::from(".symora/preferences.json"),
            catalog_path: None,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
        })
    }
}

impl CheckoutTimings {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            processing: get_millis("SYMORA_CHECKOUT_PROCESSING_MS", defaults.processing)?,
            success_display: get_millis("SYMORA_CHECKOUT_SUCCESS_MS", defaults.success_display)?,
            card_confirm: get_millis("SYMORA_CARD_CONFIRM_MS", defaults.card_confirm)?,
            tracking_advance: get_millis("SYMORA_TRACKING_ADVANCE_MS", defaults.tracking_advance)?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an optional environment variable, falling back to a default.
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Parse a millisecond duration.
fn get_millis(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Validate that a key looks like a publishable (not secret) key.
fn validate_publishable_key(key: &str, var_name: &str) -> Result<(), ConfigError> {
    if key.starts_with("sk_") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "secret keys must never be used client-side".to_string(),
        ));
    }

    let has_prefix = PUBLISHABLE_KEY_PREFIXES.iter().any(|prefix| {
        key.strip_prefix(prefix)
            .is_some_and(|rest| !rest.is_empty())
    });
    if !has_prefix {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("must start with one of {PUBLISHABLE_KEY_PREFIXES:?}"),
        ));
    }
    Ok(())
}

/// Validate that the VAT rate is a fraction in `[0, 1)`.
fn validate_vat_rate(rate: Decimal) -> Result<(), ConfigError> {
    if rate.is_sign_negative() || rate >= Decimal::ONE {
        return Err(ConfigError::InvalidEnvVar(
            "SYMORA_VAT_RATE".to_string(),
            format!("must be a fraction between 0 and 1 (got {rate})"),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_publishable_key_accepts_test_and_live() {
        assert!(validate_publishable_key("pk_test_51OaBC2DEF", "K").is_ok());
        assert!(validate_publishable_key("pk_live_abc", "K").is_ok());
    }

    #[test]
    fn test_publishable_key_rejects_secret_key() {
        let err = validate_publishable_key("sk_test_abc", "K").unwrap_err();
        assert!(err.to_string().contains("secret keys"));
    }

    #[test]
    fn test_publishable_key_rejects_bare_prefix_and_garbage() {
        assert!(validate_publishable_key("pk_test_", "K").is_err());
        assert!(validate_publishable_key("hello", "K").is_err());
    }

    #[test]
    fn test_vat_rate_bounds() {
        assert!(validate_vat_rate(Decimal::new(21, 2)).is_ok());
        assert!(validate_vat_rate(Decimal::ZERO).is_ok());
        assert!(validate_vat_rate(Decimal::ONE).is_err());
        assert!(validate_vat_rate(Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn test_default_timings_match_demo_flow() {
        let timings = CheckoutTimings::default();
        assert_eq!(timings.processing, Duration::from_secs(2));
        assert_eq!(timings.success_display, Duration::from_secs(3));
        assert_eq!(timings.card_confirm, Duration::from_millis(1500));
        assert_eq!(CheckoutTimings::instant().processing, Duration::ZERO);
    }

    #[test]
    fn test_with_publishable_key_defaults() {
        let config = StorefrontConfig::with_publishable_key("pk_test_demo").unwrap();
        assert_eq!(config.currency, CurrencyCode::EUR);
        assert_eq!(config.pricing, PricingConfig::default());
        assert!(!config.payment.apple_pay_available);
        assert!(config.catalog_path.is_none());
    }
}
