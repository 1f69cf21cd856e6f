//! Order records and their relay payload.

use std::fmt::{self, Write as _};

use chrono::{DateTime, Local};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tidepool_core::{Bag, BagItem, Money};

/// Payment method value that reveals the card-details fields.
pub const CARD: &str = "card";

/// Format of the order timestamp shown in the relayed order.
const ORDER_DATE_FORMAT: &str = "%d/%m/%Y, %I:%M:%S %p";

/// Alphabet order references are drawn from.
const REFERENCE_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of an order reference.
const REFERENCE_LENGTH: usize = 9;

/// The selected payment method, passed through exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentMethod(String);

impl PaymentMethod {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the card-details fields should be shown for this method.
    #[must_use]
    pub fn requires_card_details(&self) -> bool {
        self.0 == CARD
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Customer details taken from the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
}

impl Customer {
    /// First and last name joined by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An order as assembled at submission time.
///
/// Never stored; it only exists to be relayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub customer: Customer,
    pub payment_method: PaymentMethod,
    /// Snapshot of the bag at submission.
    pub order: Vec<BagItem>,
    /// Formatted grand total, delivery included.
    pub total: Money,
    pub order_date: String,
}

impl OrderRecord {
    /// Assemble a record from the form fields and the current bag.
    #[must_use]
    pub fn new(
        customer: Customer,
        payment_method: PaymentMethod,
        bag: &Bag,
        placed_at: DateTime<Local>,
    ) -> Self {
        Self {
            customer,
            payment_method,
            order: bag.items().to_vec(),
            total: bag.summary().total,
            order_date: placed_at.format(ORDER_DATE_FORMAT).to_string(),
        }
    }

    /// Subject line of the relayed order.
    #[must_use]
    pub fn subject(&self) -> String {
        format!("New Order - {}", self.customer.full_name())
    }

    /// Plain-text order summary delivered by the relay.
    #[must_use]
    pub fn message(&self) -> String {
        let c = &self.customer;
        let mut out = String::from("NEW ORDER RECEIVED\n\n");

        // Writing to a String cannot fail.
        let _ = writeln!(out, "Customer: {}", c.full_name());
        let _ = writeln!(out, "Email: {}", c.email);
        let _ = writeln!(out, "Phone: {}", c.phone);
        let _ = writeln!(out, "Address: {}, {} - {}\n", c.address, c.city, c.pincode);
        out.push_str("Order Details:\n");
        for item in &self.order {
            let _ = writeln!(out, "- {} (Qty: {}) - {}", item.name, item.quantity, item.price);
        }
        let _ = writeln!(out, "\nTotal Amount: {}", self.total);
        let _ = writeln!(out, "Payment Method: {}", self.payment_method);
        let _ = write!(out, "Order Date: {}", self.order_date);

        out
    }

    /// Build the relay payload.
    #[must_use]
    pub fn into_submission(self) -> OrderSubmission {
        OrderSubmission {
            subject: self.subject(),
            message: self.message(),
            record: self,
        }
    }
}

/// JSON body posted to the order relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSubmission {
    #[serde(flatten)]
    pub record: OrderRecord,
    pub subject: String,
    pub message: String,
}

/// Random reference shown to the customer after a successful order.
///
/// It is display-only; nothing records it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrderReference(String);

impl OrderReference {
    /// Draw a fresh reference.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let code = (0..REFERENCE_LENGTH)
            .filter_map(|_| REFERENCE_ALPHABET.choose(&mut rng))
            .map(|&b| char::from(b))
            .collect();
        Self(code)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
