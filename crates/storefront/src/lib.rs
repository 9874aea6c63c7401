//! SYMORA storefront library.
//!
//! Everything a storefront session needs behind the presentation layer:
//! the product catalog, the cart, customer preferences, promotions, pricing
//! and a simulated checkout behind a payment provider seam.
//!
//! # Modules
//!
//! - [`catalog`]: immutable product list
//! - [`cart`]: cart state container with derived totals
//! - [`preferences`]: local key/value preferences
//! - [`promotions`]: coupon offer, discount codes, bundles, free shipping
//! - [`pricing`]: order summary
//! - [`payment`]: payment provider seam and the simulated provider
//! - [`checkout`]: checkout state machine and simulator
//! - [`session`]: ties it all together

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod payment;
pub mod preferences;
pub mod pricing;
pub mod promotions;
pub mod session;

pub use error::{AppError, Result};
pub use session::StorefrontSession;
