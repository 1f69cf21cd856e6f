//! Checkout page controller.
//!
//! Renders a read-only summary of the persisted bag and turns the submitted
//! form into an order that is relayed once, after a simulated payment delay.
//! A successful relay clears the bag; a failed one leaves it untouched and
//! re-enables the submit control.

mod order;

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tidepool_core::{Bag, BagItem, Money};
use tracing::instrument;

pub use order::{
    CARD, Customer, OrderRecord, OrderReference, OrderSubmission, PaymentMethod,
};

use crate::bag::SummaryView;
use crate::config::CheckoutConfig;
use crate::services::{OrderRelay, RelayError};
use crate::store::{BagStore, StoreError};

/// Message shown with the order reference after a successful order.
pub const CONFIRMATION_MESSAGE: &str =
    "Thank you for your purchase. You will receive a confirmation email shortly.";

/// Errors raised by the checkout controller.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("Your bag is empty")]
    EmptyBag,

    /// An earlier submission through the same control is still pending.
    #[error("Your order is already being processed")]
    SubmissionInProgress,

    /// The order behind this control has already been placed.
    #[error("This order has already been placed")]
    AlreadySubmitted,

    /// The relay failed; the bag was left as it was.
    #[error("There was an error processing your order. Please try again.")]
    Relay(#[source] RelayError),

    /// The bag store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// =============================================================================
// Submit control
// =============================================================================

const READY: u8 = 0;
const PROCESSING: u8 = 1;
const COMPLETED: u8 = 2;

/// State of the checkout submit button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmitState {
    /// Enabled.
    Ready,
    /// Disabled while a submission is pending.
    Processing,
    /// Disabled for good; the order went through.
    Completed,
}

/// Shared submit control for one checkout page.
///
/// Clones observe the same state. At most one [`SubmitLease`] exists at a
/// time; dropping it without completing re-enables the control.
#[derive(Debug, Clone, Default)]
pub struct SubmitControl {
    state: Arc<AtomicU8>,
}

impl SubmitControl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SubmitState {
        match self.state.load(Ordering::Acquire) {
            READY => SubmitState::Ready,
            PROCESSING => SubmitState::Processing,
            _ => SubmitState::Completed,
        }
    }

    /// Disable the control for the duration of one submission.
    ///
    /// Returns `None` if the control is not [`SubmitState::Ready`].
    #[must_use]
    pub fn acquire(&self) -> Option<SubmitLease> {
        self.state
            .compare_exchange(READY, PROCESSING, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmitLease {
                state: Arc::clone(&self.state),
            })
    }
}

/// Exclusive right to submit through a [`SubmitControl`].
#[derive(Debug)]
pub struct SubmitLease {
    state: Arc<AtomicU8>,
}

impl SubmitLease {
    /// Mark the submission as successful; the control stays disabled.
    pub fn complete(self) {
        self.state.store(COMPLETED, Ordering::Release);
    }
}

impl Drop for SubmitLease {
    fn drop(&mut self) {
        let _ = self.state.compare_exchange(
            PROCESSING,
            READY,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

// =============================================================================
// Form and views
// =============================================================================

/// Checkout form fields as submitted.
///
/// Absent fields are empty strings; values are passed through unvalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CheckoutForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub payment_method: PaymentMethod,
}

impl CheckoutForm {
    /// Split into customer details and payment method.
    #[must_use]
    pub fn into_parts(self) -> (Customer, PaymentMethod) {
        let customer = Customer {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            city: self.city,
            pincode: self.pincode,
        };
        (customer, self.payment_method)
    }
}

/// A read-only checkout line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutLineView {
    pub name: String,
    pub image: String,
    pub price: Money,
    pub quantity: u32,
    pub line_total: Money,
}

impl From<&BagItem> for CheckoutLineView {
    fn from(item: &BagItem) -> Self {
        Self {
            name: item.name.clone(),
            image: item.image.clone(),
            price: item.price,
            quantity: item.quantity.get(),
            line_total: item.line_total(),
        }
    }
}

/// The rendered checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutView {
    pub items: Vec<CheckoutLineView>,
    /// Absent when the bag is empty.
    pub summary: Option<SummaryView>,
    pub bag_count: u64,
    pub submit: SubmitState,
}

/// Success view shown in place of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub reference: OrderReference,
    pub message: String,
}

impl OrderConfirmation {
    fn new(reference: OrderReference) -> Self {
        Self {
            reference,
            message: CONFIRMATION_MESSAGE.to_string(),
        }
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Checkout page controller.
pub struct CheckoutController<S, R> {
    bag: Bag,
    store: S,
    relay: R,
    control: SubmitControl,
    processing_delay: Duration,
}

impl<S: BagStore, R: OrderRelay> CheckoutController<S, R> {
    /// Load the persisted bag.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn load(store: S, relay: R, config: &CheckoutConfig) -> Result<Self, CheckoutError> {
        let bag = store.get().await?;
        Ok(Self {
            bag,
            store,
            relay,
            control: SubmitControl::new(),
            processing_delay: config.processing_delay,
        })
    }

    /// Use a submit control shared with other handles to the same page.
    #[must_use]
    pub fn with_control(mut self, control: SubmitControl) -> Self {
        self.control = control;
        self
    }

    /// The submit control of this page.
    pub const fn control(&self) -> &SubmitControl {
        &self.control
    }

    /// The controller's copy of the bag.
    pub const fn bag(&self) -> &Bag {
        &self.bag
    }

    /// Render the current page.
    pub fn render(&self) -> CheckoutView {
        CheckoutView {
            items: self.bag.items().iter().map(CheckoutLineView::from).collect(),
            summary: (!self.bag.is_empty()).then(|| SummaryView::from(&self.bag.summary())),
            bag_count: self.bag.item_count(),
            submit: self.control.state(),
        }
    }

    /// Place the order.
    ///
    /// Waits out the processing delay, then relays the order once. On
    /// success the persisted bag is cleared.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyBag`] if there is nothing to order
    /// - [`CheckoutError::SubmissionInProgress`] or
    ///   [`CheckoutError::AlreadySubmitted`] if the control is disabled
    /// - [`CheckoutError::Relay`] if the relay failed; the bag is unchanged
    #[instrument(skip_all)]
    pub async fn submit(&mut self, form: CheckoutForm) -> Result<OrderConfirmation, CheckoutError> {
        if self.bag.is_empty() {
            return Err(CheckoutError::EmptyBag);
        }

        let lease = self.control.acquire().ok_or_else(|| match self.control.state() {
            SubmitState::Completed => CheckoutError::AlreadySubmitted,
            _ => CheckoutError::SubmissionInProgress,
        })?;

        let (customer, payment_method) = form.into_parts();
        let record = OrderRecord::new(customer, payment_method, &self.bag, Local::now());
        tracing::info!(
            lines = record.order.len(),
            total = %record.total,
            payment_method = %record.payment_method,
            "Processing order"
        );

        tokio::time::sleep(self.processing_delay).await;

        if let Err(e) = self.relay.submit(&record.into_submission()).await {
            tracing::error!(error = %e, timeout = e.is_timeout(), "Order relay failed");
            return Err(CheckoutError::Relay(e));
        }

        lease.complete();
        self.bag = Bag::new();

        // The order is placed; a failed clear does not fail the request.
        if let Err(e) = self.store.clear().await {
            tracing::error!(error = %e, "Failed to clear bag after order");
        }

        let reference = OrderReference::generate();
        tracing::info!(reference = %reference, "Order placed");
        Ok(OrderConfirmation::new(reference))
    }
}
