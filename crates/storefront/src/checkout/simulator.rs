//! Timer-driven checkout.
//!
//! There is no order backend: fixed delays stand in for network latency and
//! the order is created locally once "payment" completes. Card payments are
//! tokenized through the [`PaymentProvider`] first; wallet payments skip
//! straight to processing.

use chrono::Utc;
use serde::Serialize;
use symora_core::PaymentMethod;
use tokio::time::sleep;
use tracing::instrument;

use super::flow::{CheckoutEvent, CheckoutFlow, CheckoutState, Transition};
use super::form::CheckoutForm;
use super::order::{Order, OrderDraft, OrderTracking};
use super::CheckoutError;
use crate::config::CheckoutTimings;
use crate::error::add_breadcrumb;
use crate::payment::{CardDetails, PaymentMethodToken, PaymentProvider};

/// Shown when paying by card without card details.
pub const MISSING_CARD_MESSAGE: &str = "Please enter your card details.";

/// What the customer submitted.
#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest {
    pub method: PaymentMethod,
    pub form: CheckoutForm,
    /// Required for card payments, ignored for wallets.
    pub card: Option<CardDetails>,
}

/// Result of a completed checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutOutcome {
    pub order: Order,
    pub tracking: OrderTracking,
    pub history: Vec<Transition>,
}

/// Drives a [`CheckoutFlow`] from method selection to tracking.
#[derive(Debug, Clone)]
pub struct CheckoutSimulator<P> {
    provider: P,
    timings: CheckoutTimings,
    apple_pay_available: bool,
}

impl<P: PaymentProvider> CheckoutSimulator<P> {
    /// Create a simulator.
    pub const fn new(provider: P, timings: CheckoutTimings, apple_pay_available: bool) -> Self {
        Self {
            provider,
            timings,
            apple_pay_available,
        }
    }

    /// The payment provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Delays in use.
    pub const fn timings(&self) -> CheckoutTimings {
        self.timings
    }

    /// A fresh flow offering the methods available on this storefront.
    #[must_use]
    pub fn start(&self) -> CheckoutFlow {
        CheckoutFlow::new(CheckoutFlow::offered_methods(self.apple_pay_available))
    }

    /// Run checkout to the first tracking update.
    ///
    /// On a validation or payment failure the flow is left in
    /// `SelectingMethod` with the message recorded, and the draft is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Validation`] for missing form fields or card
    /// details, [`CheckoutError::PaymentFailed`] when the provider rejects
    /// the card, and [`CheckoutError::MethodUnavailable`] or
    /// [`CheckoutError::InvalidTransition`] when the flow refuses an event.
    #[instrument(skip_all, fields(method = %request.method, items = draft.lines.len()))]
    pub async fn run(
        &self,
        flow: &mut CheckoutFlow,
        draft: OrderDraft,
        request: &CheckoutRequest,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        flow.select(request.method)?;

        let token = if request.method.is_wallet() {
            None
        } else {
            Some(self.tokenize_card(flow, request).await?)
        };

        flow.apply(CheckoutEvent::BeginProcessing)?;
        let method = request.method.to_string();
        let data: &[(&str, &str)] = &[("method", &method)];
        add_breadcrumb("checkout", "Processing payment", Some(data));
        sleep(self.timings.processing).await;

        if token.is_some() {
            tracing::info!("Payment succeeded!");
            sleep(self.timings.card_confirm).await;
        }

        let order = draft.place(request.method, token, Utc::now());
        tracing::info!(order_number = %order.number, total = %order.summary.total, "Order placed");
        let data: &[(&str, &str)] = &[("order_number", order.number.as_str())];
        add_breadcrumb("checkout", "Order placed", Some(data));
        flow.apply(CheckoutEvent::Succeed(Box::new(order)))?;
        sleep(self.timings.success_display).await;

        flow.apply(CheckoutEvent::StartTracking)?;
        sleep(self.timings.tracking_advance).await;

        flow.apply(CheckoutEvent::AdvanceTracking)?;
        match flow.state() {
            CheckoutState::Tracking { order, tracking } => {
                tracing::info!(order_number = %order.number, stage = %tracking.stage, "Tracking updated");
                Ok(CheckoutOutcome {
                    order: (**order).clone(),
                    tracking: *tracking,
                    history: flow.history().to_vec(),
                })
            }
            other => Err(CheckoutError::InvalidTransition {
                phase: other.phase(),
                event: "advance tracking",
            }),
        }
    }

    async fn tokenize_card(
        &self,
        flow: &mut CheckoutFlow,
        request: &CheckoutRequest,
    ) -> Result<PaymentMethodToken, CheckoutError> {
        let card = match (request.form.validate(), &request.card) {
            (Err(e), _) => return Err(Self::reject(flow, e)?),
            (Ok(()), None) => {
                let e = CheckoutError::Validation(MISSING_CARD_MESSAGE.to_string());
                return Err(Self::reject(flow, e)?);
            }
            (Ok(()), Some(card)) => card,
        };

        let billing = request.form.billing_details();
        match self.provider.create_payment_method(card, &billing).await {
            Ok(token) => Ok(token),
            Err(e) => {
                tracing::warn!(error = %e, "Payment method rejected");
                Err(Self::reject(flow, CheckoutError::PaymentFailed(e.to_string()))?)
            }
        }
    }

    /// Record a failed attempt on the flow and hand the error back.
    fn reject(flow: &mut CheckoutFlow, error: CheckoutError) -> Result<CheckoutError, CheckoutError> {
        flow.apply(CheckoutEvent::Fail(error.to_string()))?;
        Ok(error)
    }
}
