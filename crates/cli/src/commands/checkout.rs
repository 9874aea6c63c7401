//! Scripted checkout: fill the cart from flags, then run the simulated
//! checkout and print the order.

use clap::Args;
use symora_core::{PaymentMethod, ProductId};
use symora_storefront::cart::CartView;
use symora_storefront::checkout::{CheckoutForm, CheckoutOutcome, CheckoutRequest};
use symora_storefront::payment::CardDetails;
use symora_storefront::pricing::OrderSummary;
use thiserror::Error;

use super::CliSession;

/// Errors in checkout arguments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgError {
    /// Item is not `ID` or `ID:QTY`.
    #[error("Invalid item {0}: expected ID or ID:QTY with QTY >= 1")]
    InvalidItem(String),

    /// Expiry is not `MM/YY` or `MM/YYYY`.
    #[error("Invalid expiry {0}: expected MM/YY")]
    InvalidExpiry(String),

    /// Card payment without card flags.
    #[error("Card payments need --card-number, --expiry and --cvc")]
    MissingCard,
}

/// Arguments for `symora checkout`.
#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// Item to add, as ID or ID:QTY (repeatable)
    #[arg(short, long = "item", value_parser = parse_item)]
    pub items: Vec<(ProductId, u32)>,

    /// Add the two-unit bundle for a product (repeatable)
    #[arg(long = "bundle")]
    pub bundles: Vec<String>,

    /// Payment method (card, apple_pay, google_pay, paypal)
    #[arg(short, long, default_value = "card")]
    pub method: PaymentMethod,

    /// Discount code to apply
    #[arg(long)]
    pub discount: Option<String>,

    /// Card number
    #[arg(long)]
    pub card_number: Option<String>,

    /// Card expiry as MM/YY
    #[arg(long, value_parser = parse_expiry)]
    pub expiry: Option<(u32, i32)>,

    /// Card security code
    #[arg(long)]
    pub cvc: Option<String>,

    /// Customer email
    #[arg(long, default_value = "")]
    pub email: String,

    /// Full name
    #[arg(long, default_value = "")]
    pub name: String,

    /// Street address
    #[arg(long, default_value = "")]
    pub address: String,

    /// City
    #[arg(long, default_value = "")]
    pub city: String,

    /// Postal code
    #[arg(long, default_value = "")]
    pub postal_code: String,

    /// Country code
    #[arg(long, default_value = "NL")]
    pub country: String,

    /// Skip the simulated processing delays
    #[arg(long)]
    pub instant: bool,
}

impl CheckoutArgs {
    fn card(&self) -> Result<Option<CardDetails>, ArgError> {
        if self.method.is_wallet() {
            return Ok(None);
        }
        match (&self.card_number, self.expiry, &self.cvc) {
            (Some(number), Some((exp_month, exp_year)), Some(cvc)) => Ok(Some(CardDetails {
                number: number.clone(),
                exp_month,
                exp_year,
                cvc: cvc.clone(),
            })),
            (None, None, None) => Ok(None),
            _ => Err(ArgError::MissingCard),
        }
    }

    fn request(&self) -> Result<CheckoutRequest, ArgError> {
        Ok(CheckoutRequest {
            method: self.method,
            form: CheckoutForm {
                email: self.email.clone(),
                name: self.name.clone(),
                address: self.address.clone(),
                city: self.city.clone(),
                postal_code: self.postal_code.clone(),
                country: self.country.clone(),
            },
            card: self.card()?,
        })
    }
}

/// Parse `ID` or `ID:QTY`.
fn parse_item(raw: &str) -> Result<(ProductId, u32), ArgError> {
    let invalid = || ArgError::InvalidItem(raw.to_string());
    let (id, quantity) = match raw.split_once(':') {
        Some((id, quantity)) => (id, quantity.trim().parse::<u32>().map_err(|_| invalid())?),
        None => (raw, 1),
    };
    let id = id.trim();
    if id.is_empty() || quantity == 0 {
        return Err(invalid());
    }
    Ok((ProductId::new(id), quantity))
}

/// Parse `MM/YY` or `MM/YYYY`.
fn parse_expiry(raw: &str) -> Result<(u32, i32), ArgError> {
    let invalid = || ArgError::InvalidExpiry(raw.to_string());
    let (month, year) = raw.split_once('/').ok_or_else(invalid)?;
    let month = month.trim().parse::<u32>().map_err(|_| invalid())?;
    let year = year.trim().parse::<i32>().map_err(|_| invalid())?;
    Ok((month, year))
}

/// Fill the cart and run checkout.
///
/// # Errors
///
/// Returns an error if an argument is invalid, a product is unknown, the
/// discount code is rejected, or checkout fails.
pub async fn run(session: &mut CliSession, args: &CheckoutArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let request = args.request()?;

    for (product_id, quantity) in &args.items {
        session.add_to_cart(product_id, *quantity).map_err(report)?;
    }
    for product_id in &args.bundles {
        let offer = session.add_bundle(&ProductId::new(product_id.trim())).map_err(report)?;
        tracing::info!(
            product_id = %product_id,
            bundle_price = %offer.bundle_price,
            savings = %offer.savings,
            "Bundle added"
        );
    }
    if let Some(code) = &args.discount {
        session.apply_discount(code).map_err(report)?;
    }

    if !json {
        print_cart_summary(&CartView::from(session.cart()), &session.order_summary()?);
        let progress = session.free_shipping_progress();
        if !progress.qualifies() {
            println!("Add {} more for free shipping ({}%)", progress.remaining, progress.percent);
        }
    }

    tracing::info!(method = %args.method, "Starting checkout");
    let outcome = session.checkout(&request).await.map_err(report)?;

    if json {
        super::print_json(&outcome)?;
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

/// Log the error and swap it for its customer-facing message.
fn report(error: symora_storefront::AppError) -> String {
    error.report();
    error.user_message()
}

fn cart_lines(view: &CartView) -> Vec<String> {
    view.items
        .iter()
        .map(|item| {
            format!(
                "  {} x {:<28} {:>9}  ({} each)",
                item.quantity, item.name, item.line_price, item.price
            )
        })
        .collect()
}

fn print_cart_summary(view: &CartView, summary: &OrderSummary) {
    println!("Cart ({} items)", view.item_count);
    for line in cart_lines(view) {
        println!("{line}");
    }
    println!();
    println!("Subtotal  {}", summary.subtotal);
    if let Some(code) = summary.discount_code.as_deref().filter(|_| summary.has_discount()) {
        println!("Discount  -{} ({code})", summary.discount);
    }
    println!("Shipping  Free");
    println!("VAT       {}", summary.tax);
    println!("Total     {}", summary.total);
    println!();
}

fn print_outcome(outcome: &CheckoutOutcome) {
    let order = &outcome.order;
    println!("Order {} placed", order.number);
    println!("Paid with {}", order.payment_method.label());
    for line in &order.lines {
        println!("  {} x {:<28} {}", line.quantity, line.name, line.line_total);
    }
    println!("Total {}", order.summary.total);
    println!();
    println!(
        "{}: {}",
        outcome.tracking.stage.title(),
        outcome.tracking.stage.description()
    );
    println!(
        "Estimated delivery {}",
        outcome.tracking.estimated_delivery.format("%A, %B %-d")
    );
}
