//! Simulated checkout.
//!
//! - [`flow`]: the checkout state machine and its transition history
//! - [`form`]: customer and shipping details with presence validation
//! - [`order`]: orders, order numbers and delivery tracking
//! - [`simulator`]: drives the flow with timers and the payment provider

pub mod flow;
pub mod form;
pub mod order;
pub mod simulator;

pub use flow::{CheckoutEvent, CheckoutFlow, CheckoutPhase, CheckoutState, Transition};
pub use form::CheckoutForm;
pub use order::{Order, OrderDraft, OrderLine, OrderNumber, OrderTracking};
pub use simulator::{CheckoutOutcome, CheckoutRequest, CheckoutSimulator};

use symora_core::PaymentMethod;
use thiserror::Error;

/// Errors raised while checking out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    /// Required checkout details are missing. The message is customer-facing.
    #[error("{0}")]
    Validation(String),

    /// The payment provider rejected the payment. The message is customer-facing.
    #[error("{0}")]
    PaymentFailed(String),

    /// The payment method is not offered on this storefront.
    #[error("{} is not available", .0.label())]
    MethodUnavailable(PaymentMethod),

    /// The event is not allowed in the current state.
    #[error("cannot {event} while {phase}")]
    InvalidTransition {
        phase: CheckoutPhase,
        event: &'static str,
    },
}
