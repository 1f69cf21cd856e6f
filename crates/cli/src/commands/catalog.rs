//! Catalog commands.

use std::fmt::Write as _;
use std::path::Path;

use tidepool_core::{CatalogFilters, SortOrder};
use tidepool_storefront::catalog::{BagAdded, CatalogController, CatalogError, CatalogView, load_catalog};
use tidepool_storefront::store::FileBagStore;

use super::print_bag_count;

/// Render the catalog listing.
fn render(view: &CatalogView) -> String {
    let mut out = String::new();
    for card in &view.cards {
        let _ = writeln!(
            out,
            "[{}] {}  {}  ({}, {})",
            card.card,
            card.name,
            card.price,
            card.category.as_str(),
            card.bucket.as_str()
        );
        let _ = writeln!(out, "    {}", card.description);
    }
    if view.cards.is_empty() {
        out.push_str("No fish match your filters.\n");
    }
    let _ = write!(out, "{} of {} products", view.cards.len(), view.total);
    out
}

fn render_added(added: &BagAdded) -> String {
    format!("Added {} to bag (quantity {})", added.name, added.quantity)
}

/// List the catalog through the given filters and sort order.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
#[allow(clippy::print_stdout)]
pub fn list(
    catalog: Option<&Path>,
    bag_file: &Path,
    search: &str,
    category: &str,
    price: &str,
    sort: &str,
) -> Result<(), CatalogError> {
    let mut controller = CatalogController::new(load_catalog(catalog)?, FileBagStore::new(bag_file));
    controller.filter(CatalogFilters::from_inputs(search, category, price));
    let view = controller.sort_by(SortOrder::parse(sort));

    println!("{}", render(&view));
    Ok(())
}

/// Add the card at `card` to the bag.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, the card does not
/// exist, or the bag file cannot be written.
#[allow(clippy::print_stdout)]
pub async fn add(catalog: Option<&Path>, bag_file: &Path, card: usize) -> Result<(), CatalogError> {
    let store = FileBagStore::new(bag_file);
    let controller = CatalogController::new(load_catalog(catalog)?, &store);
    let added = controller.add_to_bag(card).await?;

    println!("{}", render_added(&added));
    print_bag_count(&store);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tidepool_storefront::store::BagStore;

    use super::*;

    #[test]
    fn test_render_marine_low_high() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller =
            CatalogController::new(load_catalog(None).unwrap(), FileBagStore::new(dir.path().join("bag.json")));
        controller.filter(CatalogFilters::from_inputs("", "marine", "all"));
        let out = render(&controller.sort_by(SortOrder::LowHigh));

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines.first().copied(),
            Some("[5] Ocellaris Clownfish Pair  ₹1,800  (marine, mid-range)")
        );
        assert_eq!(lines.last().copied(), Some("3 of 10 products"));
    }

    #[test]
    fn test_render_no_matches() {
        let dir = tempfile::tempdir().unwrap();
        let mut controller =
            CatalogController::new(load_catalog(None).unwrap(), FileBagStore::new(dir.path().join("bag.json")));
        let out = render(&controller.filter(CatalogFilters::from_inputs("shark", "all", "all")));

        assert!(out.contains("No fish match your filters."));
        assert!(out.ends_with("0 of 10 products"));
    }

    #[tokio::test]
    async fn test_add_writes_bag_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bag.json");

        add(None, &path, 1).await.unwrap();
        add(None, &path, 1).await.unwrap();

        let bag = FileBagStore::new(&path).get().await.unwrap();
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.item_count(), 2);
    }

    #[tokio::test]
    async fn test_add_unknown_card() {
        let dir = tempfile::tempdir().unwrap();
        let err = add(None, &dir.path().join("bag.json"), 42).await.unwrap_err();
        assert!(matches!(err, CatalogError::UnknownCard(42)));
    }
}
