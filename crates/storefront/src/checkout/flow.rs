//! Checkout state machine.
//!
//! | From                       | Event            | To                              |
//! |----------------------------|------------------|---------------------------------|
//! | SelectingMethod            | select           | SelectingMethod                 |
//! | SelectingMethod            | begin processing | Processing                      |
//! | SelectingMethod            | fail             | SelectingMethod (with error)    |
//! | SelectingMethod/Processing | cancel           | SelectingMethod (as Cancelled)  |
//! | Processing                 | succeed          | Succeeded                       |
//! | Succeeded                  | start tracking   | Tracking                        |
//! | Tracking                   | advance tracking | Tracking                        |
//!
//! Every other combination is rejected with
//! [`CheckoutError::InvalidTransition`] and leaves the state untouched.

use std::fmt;

use serde::Serialize;
use symora_core::PaymentMethod;

use super::CheckoutError;
use super::order::{Order, OrderTracking};

/// Current checkout state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    /// Choosing how to pay. `last_error` holds the message of the last
    /// failed attempt.
    SelectingMethod {
        selected: PaymentMethod,
        last_error: Option<String>,
    },
    /// Payment is being processed.
    Processing { method: PaymentMethod },
    /// Payment went through and the order was placed.
    Succeeded { order: Box<Order> },
    /// Showing delivery progress.
    Tracking {
        order: Box<Order>,
        tracking: OrderTracking,
    },
}

impl CheckoutState {
    /// The phase of this state.
    #[must_use]
    pub const fn phase(&self) -> CheckoutPhase {
        match self {
            Self::SelectingMethod { .. } => CheckoutPhase::SelectingMethod,
            Self::Processing { .. } => CheckoutPhase::Processing,
            Self::Succeeded { .. } => CheckoutPhase::Succeeded,
            Self::Tracking { .. } => CheckoutPhase::Tracking,
        }
    }
}

/// State names, as recorded in the transition history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    SelectingMethod,
    Processing,
    Succeeded,
    Tracking,
    /// Exit recorded when checkout is cancelled; the flow itself returns to
    /// `SelectingMethod`.
    Cancelled,
}

impl fmt::Display for CheckoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SelectingMethod => "selecting a payment method",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Tracking => "tracking",
            Self::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Events accepted by [`CheckoutFlow::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutEvent {
    Select(PaymentMethod),
    BeginProcessing,
    Fail(String),
    Cancel,
    Succeed(Box<Order>),
    StartTracking,
    AdvanceTracking,
}

impl CheckoutEvent {
    /// Short name used in errors and history.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Select(_) => "select a payment method",
            Self::BeginProcessing => "begin processing",
            Self::Fail(_) => "fail",
            Self::Cancel => "cancel",
            Self::Succeed(_) => "succeed",
            Self::StartTracking => "start tracking",
            Self::AdvanceTracking => "advance tracking",
        }
    }
}

/// One recorded transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: CheckoutPhase,
    pub event: &'static str,
    pub to: CheckoutPhase,
}

/// The checkout state machine.
#[derive(Debug, Clone)]
pub struct CheckoutFlow {
    state: CheckoutState,
    available: Vec<PaymentMethod>,
    history: Vec<Transition>,
}

impl CheckoutFlow {
    /// Start a checkout offering the given methods. The first one is
    /// preselected; an empty list falls back to card only.
    #[must_use]
    pub fn new(mut available: Vec<PaymentMethod>) -> Self {
        if available.is_empty() {
            available.push(PaymentMethod::Card);
        }
        let selected = available.first().copied().unwrap_or_default();
        Self {
            state: CheckoutState::SelectingMethod {
                selected,
                last_error: None,
            },
            available,
            history: Vec::new(),
        }
    }

    /// Methods offered on this storefront. Apple Pay only when available.
    #[must_use]
    pub fn offered_methods(apple_pay_available: bool) -> Vec<PaymentMethod> {
        PaymentMethod::ALL
            .into_iter()
            .filter(|method| apple_pay_available || *method != PaymentMethod::ApplePay)
            .collect()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> CheckoutPhase {
        self.state.phase()
    }

    /// Methods this flow accepts.
    #[must_use]
    pub fn available_methods(&self) -> &[PaymentMethod] {
        &self.available
    }

    /// Every transition taken so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Transition] {
        &self.history
    }

    /// Message of the last failed attempt, while selecting a method.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        match &self.state {
            CheckoutState::SelectingMethod { last_error, .. } => last_error.as_deref(),
            _ => None,
        }
    }

    /// The placed order, once checkout succeeded.
    #[must_use]
    pub fn order(&self) -> Option<&Order> {
        match &self.state {
            CheckoutState::Succeeded { order } | CheckoutState::Tracking { order, .. } => Some(order),
            _ => None,
        }
    }

    /// Apply an event.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] if the event is not
    /// allowed in the current state, or [`CheckoutError::MethodUnavailable`]
    /// when selecting a method this flow does not offer.
    pub fn apply(&mut self, event: CheckoutEvent) -> Result<&CheckoutState, CheckoutError> {
        let from = self.phase();
        let name = event.name();
        let invalid = || CheckoutError::InvalidTransition { phase: from, event: name };

        let (next, recorded) = match (&self.state, event) {
            (CheckoutState::SelectingMethod { .. }, CheckoutEvent::Select(method)) => {
                if !self.available.contains(&method) {
                    return Err(CheckoutError::MethodUnavailable(method));
                }
                let state = CheckoutState::SelectingMethod {
                    selected: method,
                    last_error: None,
                };
                (state, CheckoutPhase::SelectingMethod)
            }
            (CheckoutState::SelectingMethod { selected, .. }, CheckoutEvent::BeginProcessing) => {
                (CheckoutState::Processing { method: *selected }, CheckoutPhase::Processing)
            }
            (CheckoutState::SelectingMethod { selected, .. }, CheckoutEvent::Fail(message)) => {
                let state = CheckoutState::SelectingMethod {
                    selected: *selected,
                    last_error: Some(message),
                };
                (state, CheckoutPhase::SelectingMethod)
            }
            (CheckoutState::SelectingMethod { selected, .. }, CheckoutEvent::Cancel)
            | (CheckoutState::Processing { method: selected }, CheckoutEvent::Cancel) => {
                let state = CheckoutState::SelectingMethod {
                    selected: *selected,
                    last_error: None,
                };
                (state, CheckoutPhase::Cancelled)
            }
            (CheckoutState::Processing { method }, CheckoutEvent::Succeed(order)) => {
                if order.payment_method != *method {
                    return Err(invalid());
                }
                (CheckoutState::Succeeded { order }, CheckoutPhase::Succeeded)
            }
            (CheckoutState::Succeeded { order }, CheckoutEvent::StartTracking) => {
                let tracking = OrderTracking::start(order.placed_at);
                let state = CheckoutState::Tracking {
                    order: order.clone(),
                    tracking,
                };
                (state, CheckoutPhase::Tracking)
            }
            (CheckoutState::Tracking { order, tracking }, CheckoutEvent::AdvanceTracking) => {
                let mut tracking = *tracking;
                if !tracking.advance() {
                    return Err(invalid());
                }
                let state = CheckoutState::Tracking {
                    order: order.clone(),
                    tracking,
                };
                (state, CheckoutPhase::Tracking)
            }
            _ => return Err(invalid()),
        };

        let transition = Transition {
            from,
            event: name,
            to: recorded,
        };
        tracing::debug!(from = %transition.from, event = name, to = %transition.to, "Checkout transition");
        self.history.push(transition);
        self.state = next;
        Ok(&self.state)
    }

    /// Choose a payment method.
    ///
    /// # Errors
    ///
    /// See [`CheckoutFlow::apply`].
    pub fn select(&mut self, method: PaymentMethod) -> Result<&CheckoutState, CheckoutError> {
        self.apply(CheckoutEvent::Select(method))
    }

    /// Abandon the current attempt and return to method selection.
    ///
    /// # Errors
    ///
    /// See [`CheckoutFlow::apply`].
    pub fn cancel(&mut self) -> Result<&CheckoutState, CheckoutError> {
        self.apply(CheckoutEvent::Cancel)
    }
}
