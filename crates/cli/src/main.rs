//! SYMORA CLI - browse the catalog, check out, and manage stored preferences.
//!
//! # Usage
//!
//! ```bash
//! # List products, optionally by category
//! symora products --category posture
//!
//! # Show one product with its bundle offer
//! symora product 1
//!
//! # Check out two posture correctors with the demo card
//! symora checkout --item 1:2 --method card \
//!     --card-number 4242424242424242 --expiry 12/34 --cvc 123 \
//!     --email emma@example.nl --name "Emma de Jong" \
//!     --address "Keizersgracht 1" --city Amsterdam --postal-code "1015 CJ"
//!
//! # Claim the 10% welcome code
//! symora subscribe --email emma@example.nl
//!
//! # Inspect or wipe stored preferences
//! symora prefs show
//! symora prefs reset
//! ```
//!
//! # Commands
//!
//! - `products` - List the catalog
//! - `product` - Show a single product
//! - `checkout` - Fill a cart and run the simulated checkout
//! - `subscribe` - Submit an email to the coupon offer
//! - `prefs` - Show or reset stored preferences

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use symora_storefront::config::{CheckoutTimings, StorefrontConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "symora")]
#[command(author, version, about = "SYMORA storefront CLI")]
struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products {
        /// Only show products in this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show a single product
    Product {
        /// Product id
        id: String,
    },
    /// Fill a cart and run the simulated checkout
    Checkout(commands::checkout::CheckoutArgs),
    /// Submit an email to the coupon offer and receive the welcome code
    Subscribe {
        /// Email address
        #[arg(short, long)]
        email: String,
    },
    /// Manage stored preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Show stored preferences
    Show,
    /// Remove every stored preference
    Reset,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(log_json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "symora_storefront=info,symora_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(log_json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!log_json).then(tracing_subscriber::fmt::layer))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = init_sentry(&config);
    init_tracing(config.log_json);

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mut config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    match cli.command {
        Commands::Products { category } => {
            let session = commands::open_session(&config)?;
            commands::catalog::list(session.catalog(), category.as_deref(), json)?;
        }
        Commands::Product { id } => {
            let session = commands::open_session(&config)?;
            commands::catalog::show(session.catalog(), &id, json)?;
        }
        Commands::Checkout(args) => {
            if args.instant {
                config.checkout = CheckoutTimings::instant();
            }
            let mut session = commands::open_session(&config)?;
            commands::checkout::run(&mut session, &args, json).await?;
        }
        Commands::Subscribe { email } => {
            let mut session = commands::open_session(&config)?;
            commands::prefs::subscribe(&mut session, &email, json)?;
        }
        Commands::Prefs { action } => {
            let mut session = commands::open_session(&config)?;
            match action {
                PrefsAction::Show => commands::prefs::show(&session, json)?,
                PrefsAction::Reset => commands::prefs::reset(&mut session)?,
            }
        }
    }
    Ok(())
}
