//! Bag page controller.
//!
//! Loads the persisted bag once at construction and works on that copy:
//! every quantity change or removal writes the whole bag back and returns a
//! freshly rendered view whose actions are bound to line positions.

use serde::Serialize;
use thiserror::Error;
use tidepool_core::{Adjustment, Bag, BagItem, Money, OrderSummary};
use tracing::instrument;

use crate::store::{BagStore, StoreError};

/// Errors raised by the bag controller.
#[derive(Debug, Error)]
pub enum BagError {
    /// No bag line exists at the given position.
    #[error("No bag item at position {0}")]
    NoSuchItem(usize),

    /// Checkout was requested with nothing in the bag.
    #[error("Your bag is empty!")]
    Empty,

    /// The bag store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Formatted order summary as shown on the bag and checkout pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryView {
    pub subtotal: String,
    /// `FREE` or the formatted fee.
    pub delivery: String,
    pub total: String,
}

impl From<&OrderSummary> for SummaryView {
    fn from(summary: &OrderSummary) -> Self {
        Self {
            subtotal: summary.subtotal.to_string(),
            delivery: summary.delivery_label(),
            total: summary.total.to_string(),
        }
    }
}

/// A rendered bag line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BagLineView {
    /// Line position; the target of the line's quantity and remove actions.
    pub index: usize,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: Money,
    pub quantity: u32,
}

impl BagLineView {
    fn new(index: usize, item: &BagItem) -> Self {
        Self {
            index,
            name: item.name.clone(),
            description: item.description.clone(),
            image: item.image.clone(),
            price: item.price,
            quantity: item.quantity.get(),
        }
    }
}

/// The rendered bag page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BagView {
    pub items: Vec<BagLineView>,
    /// Absent when the bag is empty.
    pub summary: Option<SummaryView>,
    pub bag_count: u64,
}

impl BagView {
    /// Returns `true` when the empty-bag panel should be shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Bag page controller.
pub struct BagController<S> {
    bag: Bag,
    store: S,
}

impl<S: BagStore> BagController<S> {
    /// Load the persisted bag.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub async fn load(store: S) -> Result<Self, BagError> {
        let bag = store.get().await?;
        Ok(Self { bag, store })
    }

    /// The controller's copy of the bag.
    pub const fn bag(&self) -> &Bag {
        &self.bag
    }

    /// Subtotal, delivery and total of the current bag.
    pub fn summary(&self) -> OrderSummary {
        self.bag.summary()
    }

    /// Render the current page.
    pub fn render(&self) -> BagView {
        BagView {
            items: self
                .bag
                .items()
                .iter()
                .enumerate()
                .map(|(index, item)| BagLineView::new(index, item))
                .collect(),
            summary: (!self.bag.is_empty()).then(|| SummaryView::from(&self.summary())),
            bag_count: self.bag.item_count(),
        }
    }

    /// Change the quantity of the line at `index` by `delta`.
    ///
    /// A result below one removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`BagError::NoSuchItem`] for an out-of-range position, or a
    /// store error if the bag cannot be written.
    #[instrument(skip(self))]
    pub async fn adjust_quantity(&mut self, index: usize, delta: i64) -> Result<BagView, BagError> {
        match self.bag.adjust_quantity(index, delta) {
            Some(Adjustment::Updated { name, quantity }) => {
                tracing::info!(product = %name, quantity = quantity.get(), "Quantity updated");
            }
            Some(Adjustment::Removed(item)) => {
                tracing::info!(product = %item.name, "Removed from bag");
            }
            None => return Err(BagError::NoSuchItem(index)),
        }

        self.store.set(&self.bag).await?;
        Ok(self.render())
    }

    /// Remove the line at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`BagError::NoSuchItem`] for an out-of-range position, or a
    /// store error if the bag cannot be written.
    #[instrument(skip(self))]
    pub async fn remove(&mut self, index: usize) -> Result<BagView, BagError> {
        let item = self
            .bag
            .remove(index)
            .ok_or(BagError::NoSuchItem(index))?;
        tracing::info!(product = %item.name, "Removed from bag");

        self.store.set(&self.bag).await?;
        Ok(self.render())
    }

    /// Guard for the proceed-to-checkout action.
    ///
    /// # Errors
    ///
    /// Returns [`BagError::Empty`] if there is nothing to check out.
    pub fn begin_checkout(&self) -> Result<(), BagError> {
        if self.bag.is_empty() {
            return Err(BagError::Empty);
        }
        Ok(())
    }
}
