//! Bag commands.

use std::fmt::Write as _;
use std::path::Path;

use tidepool_storefront::bag::{BagController, BagError, BagView, SummaryView};
use tidepool_storefront::store::FileBagStore;

use super::print_bag_count;

pub(crate) fn render_summary(out: &mut String, summary: &SummaryView) {
    let _ = writeln!(out, "Subtotal: {}", summary.subtotal);
    let _ = writeln!(out, "Delivery: {}", summary.delivery);
    let _ = write!(out, "Total:    {}", summary.total);
}

/// Render the bag page.
fn render(view: &BagView) -> String {
    let Some(summary) = &view.summary else {
        return "Your bag is empty".to_string();
    };

    let mut out = String::new();
    for line in &view.items {
        let _ = writeln!(
            out,
            "[{}] {}  {} x {}",
            line.index, line.name, line.price, line.quantity
        );
    }
    out.push('\n');
    render_summary(&mut out, summary);
    out
}

/// Show the bag.
///
/// # Errors
///
/// Returns an error if the bag file cannot be read.
#[allow(clippy::print_stdout)]
pub async fn show(bag_file: &Path) -> Result<(), BagError> {
    let bag = BagController::load(FileBagStore::new(bag_file)).await?;
    println!("{}", render(&bag.render()));
    Ok(())
}

/// Change the quantity of the line at `index` by `delta`.
///
/// # Errors
///
/// Returns an error if there is no such line or the bag file cannot be written.
#[allow(clippy::print_stdout)]
pub async fn adjust(bag_file: &Path, index: usize, delta: i64) -> Result<(), BagError> {
    let store = FileBagStore::new(bag_file);
    let mut bag = BagController::load(&store).await?;
    let view = bag.adjust_quantity(index, delta).await?;

    println!("{}", render(&view));
    print_bag_count(&store);
    Ok(())
}

/// Remove the line at `index`.
///
/// # Errors
///
/// Returns an error if there is no such line or the bag file cannot be written.
#[allow(clippy::print_stdout)]
pub async fn remove(bag_file: &Path, index: usize) -> Result<(), BagError> {
    let store = FileBagStore::new(bag_file);
    let mut bag = BagController::load(&store).await?;
    let view = bag.remove(index).await?;

    println!("{}", render(&view));
    print_bag_count(&store);
    Ok(())
}
