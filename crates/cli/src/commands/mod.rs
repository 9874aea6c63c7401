//! CLI command implementations.

pub mod catalog;
pub mod checkout;
pub mod prefs;

use symora_storefront::catalog::Catalog;
use symora_storefront::config::StorefrontConfig;
use symora_storefront::payment::SimulatedPaymentProvider;
use symora_storefront::preferences::FileStore;
use symora_storefront::{AppError, StorefrontSession};

/// Session type used by every command.
pub type CliSession = StorefrontSession<FileStore, SimulatedPaymentProvider>;

/// Load the catalog and preferences file and start a session.
///
/// # Errors
///
/// Returns an error if the catalog or the preferences file cannot be loaded.
pub fn open_session(config: &StorefrontConfig) -> Result<CliSession, AppError> {
    let catalog = Catalog::load(config.catalog_path.as_deref(), config.currency)?;
    let store = FileStore::open(&config.preferences_path)?;
    let provider = SimulatedPaymentProvider::new(&config.payment);

    tracing::debug!(
        products = catalog.len(),
        preferences = %config.preferences_path.display(),
        "Session opened"
    );
    Ok(StorefrontSession::new(config, catalog, store, provider))
}

/// Print a value as pretty JSON.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
