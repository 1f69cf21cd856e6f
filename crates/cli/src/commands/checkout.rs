//! Checkout command.

use std::fmt::Write as _;
use std::path::Path;

use clap::Args;
use thiserror::Error;
use tidepool_storefront::checkout::{
    CheckoutController, CheckoutError, CheckoutForm, CheckoutView, OrderConfirmation,
    PaymentMethod,
};
use tidepool_storefront::config::{CheckoutConfig, ConfigError, RelayConfig};
use tidepool_storefront::services::{FormRelayClient, RelayError};
use tidepool_storefront::store::FileBagStore;

use super::bag::render_summary;

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutCommandError {
    /// Relay or checkout settings are missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The relay client could not be built.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// The order could not be placed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

/// Checkout form fields.
///
/// Values are passed to the relay exactly as given.
#[derive(Debug, Args)]
pub struct CheckoutArgs {
    /// Only show the order summary
    #[arg(long)]
    review: bool,

    #[arg(long, default_value = "")]
    first_name: String,

    #[arg(long, default_value = "")]
    last_name: String,

    #[arg(long, default_value = "")]
    email: String,

    #[arg(long, default_value = "")]
    phone: String,

    #[arg(long, default_value = "")]
    address: String,

    #[arg(long, default_value = "")]
    city: String,

    #[arg(long, default_value = "")]
    pincode: String,

    /// Payment method (`card` asks for card details)
    #[arg(long, default_value = "cod")]
    payment_method: String,
}

impl CheckoutArgs {
    fn into_form(self) -> CheckoutForm {
        CheckoutForm {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            city: self.city,
            pincode: self.pincode,
            payment_method: PaymentMethod::new(self.payment_method),
        }
    }
}

/// Render the read-only checkout summary.
fn render(view: &CheckoutView, payment_method: &PaymentMethod) -> String {
    let Some(summary) = &view.summary else {
        return "Your bag is empty".to_string();
    };

    let mut out = String::new();
    for line in &view.items {
        let _ = writeln!(
            out,
            "{}  {} x {}  {}",
            line.name, line.price, line.quantity, line.line_total
        );
    }
    out.push('\n');
    render_summary(&mut out, summary);
    if payment_method.requires_card_details() {
        out.push_str("\n\nCard details will be requested at payment.");
    }
    out
}

fn render_confirmation(confirmation: &OrderConfirmation) -> String {
    format!(
        "Order Successful!\n{}\nOrder ID: {}",
        confirmation.message, confirmation.reference
    )
}

/// Review the bag or place the order.
///
/// # Errors
///
/// Returns an error if the relay is not configured, the bag is empty, or the
/// order could not be relayed. A failed order leaves the bag untouched.
#[allow(clippy::print_stdout)]
pub async fn run(bag_file: &Path, args: CheckoutArgs) -> Result<(), CheckoutCommandError> {
    let relay = FormRelayClient::new(&RelayConfig::from_env()?)?;
    let config = CheckoutConfig::from_env()?;
    let store = FileBagStore::new(bag_file);

    let mut checkout = CheckoutController::load(&store, &relay, &config).await?;
    let review = args.review;
    let form = args.into_form();

    println!("{}", render(&checkout.render(), &form.payment_method));
    if review {
        return Ok(());
    }

    println!("\nProcessing...");
    let confirmation = checkout.submit(form).await?;
    println!("\n{}", render_confirmation(&confirmation));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tidepool_core::Money;
    use tidepool_storefront::bag::SummaryView;
    use tidepool_storefront::checkout::{CheckoutLineView, SubmitState};

    use super::*;

    fn view() -> CheckoutView {
        CheckoutView {
            items: vec![CheckoutLineView {
                name: "Regal Blue Tang".to_string(),
                image: String::new(),
                price: Money::from_rupees(4500),
                quantity: 2,
                line_total: Money::from_rupees(9000),
            }],
            summary: Some(SummaryView {
                subtotal: "₹9,000".to_string(),
                delivery: "FREE".to_string(),
                total: "₹9,000".to_string(),
            }),
            bag_count: 2,
            submit: SubmitState::Ready,
        }
    }

    #[test]
    fn test_render_review() {
        let out = render(&view(), &PaymentMethod::new("upi"));
        assert_eq!(
            out,
            "Regal Blue Tang  ₹4,500 x 2  ₹9,000\n\n\
             Subtotal: ₹9,000\n\
             Delivery: FREE\n\
             Total:    ₹9,000"
        );
    }

    #[test]
    fn test_card_payment_mentions_card_details() {
        let out = render(&view(), &PaymentMethod::new("card"));
        assert!(out.ends_with("Card details will be requested at payment."));
    }

    #[test]
    fn test_args_map_to_form() {
        let args = CheckoutArgs {
            review: false,
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            city: "Kochi".to_string(),
            pincode: "682001".to_string(),
            payment_method: "card".to_string(),
        };
        let form = args.into_form();

        assert_eq!(form.first_name, "Asha");
        assert_eq!(form.city, "Kochi");
        assert!(form.payment_method.requires_card_details());
    }
}
