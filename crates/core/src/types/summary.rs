//! Order summary computation shared by the bag and checkout pages.

use rust_decimal::Decimal;
use serde::Serialize;

use super::bag::BagItem;
use super::money::Money;

/// Subtotals strictly above this amount ship for free.
pub const FREE_DELIVERY_THRESHOLD: Money = Money::new(Decimal::from_parts(5000, 0, 0, false, 0));

/// Delivery fee charged at or below [`FREE_DELIVERY_THRESHOLD`].
pub const FLAT_DELIVERY_FEE: Money = Money::new(Decimal::from_parts(100, 0, 0, false, 0));

/// Label shown instead of a zero delivery fee.
pub const FREE_DELIVERY_LABEL: &str = "FREE";

/// Subtotal, delivery fee and total for a set of bag lines.
///
/// ```
/// use tidepool_core::{Money, OrderSummary};
///
/// let summary = OrderSummary::from_subtotal(Money::from_rupees(1000));
/// assert_eq!(summary.delivery, Money::from_rupees(100));
/// assert_eq!(summary.total, Money::from_rupees(1100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub subtotal: Money,
    pub delivery: Money,
    pub total: Money,
}

impl OrderSummary {
    /// Compute the summary for the given lines.
    pub fn for_items<'a>(items: impl IntoIterator<Item = &'a BagItem>) -> Self {
        Self::from_subtotal(items.into_iter().map(BagItem::line_total).sum())
    }

    /// Apply the delivery rule to a subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Money) -> Self {
        let delivery = if subtotal > FREE_DELIVERY_THRESHOLD {
            Money::ZERO
        } else {
            FLAT_DELIVERY_FEE
        };

        Self {
            subtotal,
            delivery,
            total: subtotal + delivery,
        }
    }

    /// Returns `true` if no delivery fee applies.
    #[must_use]
    pub fn is_free_delivery(&self) -> bool {
        self.delivery.is_zero()
    }

    /// Delivery fee as displayed: `FREE` or the formatted amount.
    #[must_use]
    pub fn delivery_label(&self) -> String {
        if self.is_free_delivery() {
            FREE_DELIVERY_LABEL.to_string()
        } else {
            self.delivery.to_string()
        }
    }
}
