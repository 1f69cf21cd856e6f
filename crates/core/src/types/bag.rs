//! Shopping bag types.
//!
//! A [`Bag`] is an ordered list of [`BagItem`]s. Items have no identity of
//! their own: two entries describe the same product when their name and price
//! are equal, and every other operation addresses items by position.

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::money::Money;
use super::summary::OrderSummary;

/// A product line in the bag.
///
/// `quantity` is never zero: an item that would drop below one is removed
/// from the bag instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagItem {
    pub name: String,
    pub price: Money,
    pub image: String,
    pub description: String,
    pub quantity: NonZeroU32,
}

impl BagItem {
    /// Create a bag line with a quantity of one.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        price: Money,
        image: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            image: image.into(),
            description: description.into(),
            quantity: NonZeroU32::MIN,
        }
    }

    /// Returns `true` if both lines describe the same product.
    #[must_use]
    pub fn same_product(&self, other: &Self) -> bool {
        self.name == other.name && self.price == other.price
    }

    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity.get())
    }
}

/// Outcome of a quantity adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Adjustment {
    /// The line kept a quantity of at least one.
    Updated {
        /// Product name of the adjusted line.
        name: String,
        /// New quantity.
        quantity: NonZeroU32,
    },
    /// The adjustment would have dropped below one, so the line was removed.
    Removed(BagItem),
}

/// The shopping bag.
///
/// Serializes as a bare JSON array of items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bag {
    items: Vec<BagItem>,
}

impl Bag {
    /// Create an empty bag.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Returns the items in bag order.
    #[must_use]
    pub fn items(&self) -> &[BagItem] {
        &self.items
    }

    /// Returns the item at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&BagItem> {
        self.items.get(index)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the bag has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Merge a product into the bag.
    ///
    /// If a line for the same product exists its quantity grows by one,
    /// otherwise `item` is appended with a quantity of one. Returns the
    /// position of the affected line.
    pub fn add(&mut self, item: BagItem) -> usize {
        if let Some(index) = self.items.iter().position(|line| line.same_product(&item)) {
            if let Some(line) = self.items.get_mut(index) {
                line.quantity = line.quantity.saturating_add(1);
            }
            return index;
        }

        self.items.push(BagItem {
            quantity: NonZeroU32::MIN,
            ..item
        });
        self.items.len() - 1
    }

    /// Change the quantity of the line at `index` by `delta`.
    ///
    /// A result below one removes the line. There is no upper bound beyond
    /// `u32::MAX`. Returns `None` if `index` is out of range.
    pub fn adjust_quantity(&mut self, index: usize, delta: i64) -> Option<Adjustment> {
        let line = self.items.get_mut(index)?;
        let requested = i64::from(line.quantity.get()).saturating_add(delta);

        if requested < 1 {
            return self.remove(index).map(Adjustment::Removed);
        }

        line.quantity = u32::try_from(requested)
            .ok()
            .and_then(NonZeroU32::new)
            .unwrap_or(NonZeroU32::MAX);

        Some(Adjustment::Updated {
            name: line.name.clone(),
            quantity: line.quantity,
        })
    }

    /// Remove and return the line at `index`.
    pub fn remove(&mut self, index: usize) -> Option<BagItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Subtotal, delivery fee and total for the current contents.
    #[must_use]
    pub fn summary(&self) -> OrderSummary {
        OrderSummary::for_items(&self.items)
    }
}

impl FromIterator<BagItem> for Bag {
    fn from_iter<I: IntoIterator<Item = BagItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
