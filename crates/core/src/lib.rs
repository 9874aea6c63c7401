//! SYMORA Core - Shared types library.
//!
//! This crate provides common types used across all SYMORA components:
//! - `storefront` - Catalog, cart, promotions and the simulated checkout
//! - `cli` - Command-line driver for storefront sessions
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no timers,
//! no payment clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, statuses and products

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
