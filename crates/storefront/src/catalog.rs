//! Catalog page controller.
//!
//! Filters and sorts a fixed list of product cards and adds cards to the
//! shared bag. Cards keep their catalog position as a stable index, so the
//! add-to-bag action bound to a rendered card survives any reordering.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tidepool_core::{CatalogFilters, Category, Money, PriceBucket, Product, SortOrder};
use tracing::instrument;

use crate::store::{BagStore, StoreError};

/// Catalog bundled with the crate, used when no catalog file is configured.
const BUNDLED_CATALOG: &str = include_str!("../catalog.json");

/// Errors raised by the catalog controller.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No card exists at the given catalog position.
    #[error("Unknown catalog card: {0}")]
    UnknownCard(usize),

    /// Reading the catalog file failed.
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// The catalog file is not a valid product list.
    #[error("Invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// The bag store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Load the product list from `path`, or the bundled catalog if `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
pub fn load_catalog(path: Option<&Path>) -> Result<Vec<Product>, CatalogError> {
    let Some(path) = path else {
        return Ok(serde_json::from_str(BUNDLED_CATALOG)?);
    };

    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

/// A rendered product card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    /// Catalog position; the target of the card's add-to-bag action.
    pub card: usize,
    pub name: String,
    pub price: Money,
    pub image: String,
    pub description: String,
    pub category: Category,
    pub bucket: PriceBucket,
}

impl CardView {
    fn new(card: usize, product: &Product) -> Self {
        Self {
            card,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            bucket: product.bucket.clone(),
        }
    }
}

/// The rendered catalog page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogView {
    /// Visible cards in display order.
    pub cards: Vec<CardView>,
    /// Number of cards in the catalog, visible or not.
    pub total: usize,
    pub sort: SortOrder,
}

/// Result of adding a card to the bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BagAdded {
    pub name: String,
    /// Quantity of the product's bag line after the merge.
    pub quantity: u32,
    /// Units across the whole bag.
    pub bag_count: u64,
}

/// Catalog page controller.
pub struct CatalogController<S> {
    cards: Arc<[Product]>,
    filters: CatalogFilters,
    sort: SortOrder,
    store: S,
}

impl<S: BagStore> CatalogController<S> {
    /// Create a controller showing every card in catalog order.
    pub fn new(cards: impl Into<Arc<[Product]>>, store: S) -> Self {
        Self {
            cards: cards.into(),
            filters: CatalogFilters::default(),
            sort: SortOrder::Default,
            store,
        }
    }

    /// Current filter inputs.
    pub const fn filters(&self) -> &CatalogFilters {
        &self.filters
    }

    /// Current sort order.
    pub const fn sort(&self) -> SortOrder {
        self.sort
    }

    /// Replace the filter inputs and re-render.
    pub fn filter(&mut self, filters: CatalogFilters) -> CatalogView {
        self.filters = filters;
        self.render()
    }

    /// Change the sort order and re-render.
    pub fn sort_by(&mut self, sort: SortOrder) -> CatalogView {
        self.sort = sort;
        self.render()
    }

    /// Visible cards with their catalog positions, in display order.
    ///
    /// Hidden cards take no part in sorting, and the sort is stable so equal
    /// keys keep catalog order.
    pub fn visible(&self) -> Vec<(usize, &Product)> {
        let mut visible: Vec<(usize, &Product)> = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, product)| self.filters.matches(product))
            .collect();
        visible.sort_by(|(_, a), (_, b)| self.sort.compare(a, b));
        visible
    }

    /// Render the current page.
    pub fn render(&self) -> CatalogView {
        CatalogView {
            cards: self
                .visible()
                .into_iter()
                .map(|(card, product)| CardView::new(card, product))
                .collect(),
            total: self.cards.len(),
            sort: self.sort,
        }
    }

    /// Merge the product at catalog position `card` into the bag.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownCard`] for an out-of-range position, or
    /// a store error if the bag cannot be read or written.
    #[instrument(skip(self))]
    pub async fn add_to_bag(&self, card: usize) -> Result<BagAdded, CatalogError> {
        let product = self
            .cards
            .get(card)
            .ok_or(CatalogError::UnknownCard(card))?;

        let mut bag = self.store.get().await?;
        let index = bag.add(product.to_bag_item());
        self.store.set(&bag).await?;

        let quantity = bag.get(index).map_or(1, |line| line.quantity.get());
        tracing::info!(product = %product.name, quantity, "Added to bag");

        Ok(BagAdded {
            name: product.name.clone(),
            quantity,
            bag_count: bag.item_count(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use tidepool_core::Filter;

    use super::*;
    use crate::store::MemoryBagStore;

    fn product(name: &str, price: &str, category: &str, bucket: &str) -> Product {
        Product {
            name: name.to_string(),
            price: Money::parse(price).unwrap(),
            image: format!("/img/{name}.jpg"),
            description: format!("{name} description"),
            category: Category::from(category),
            bucket: PriceBucket::from(bucket),
        }
    }

    fn sample() -> Vec<Product> {
        vec![
            product("Tiger Oscar", "₹1,200", "freshwater", "mid-range"),
            product("Halfmoon Betta", "₹500", "freshwater", "budget"),
            product("Betta Splendens Pair", "₹900", "freshwater", "mid-range"),
            product("Clownfish", "₹1,800", "marine", "mid-range"),
        ]
    }

    fn names(view: &CatalogView) -> Vec<&str> {
        view.cards.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_bundled_catalog_parses() {
        let catalog = load_catalog(None).unwrap();
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_load_catalog_missing_file() {
        let err = load_catalog(Some(Path::new("/nonexistent/catalog.json"))).unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }

    #[test]
    fn test_initial_render_shows_everything_in_catalog_order() {
        let catalog = CatalogController::new(sample(), MemoryBagStore::new());
        let view = catalog.render();

        assert_eq!(view.total, 4);
        assert_eq!(view.cards.len(), 4);
        assert_eq!(view.cards[0].name, "Tiger Oscar");
    }

    #[test]
    fn test_category_all_with_search_term() {
        let mut catalog = CatalogController::new(sample(), MemoryBagStore::new());
        let view = catalog.filter(CatalogFilters::from_inputs("betta", "all", "all"));

        assert_eq!(names(&view), vec!["Halfmoon Betta", "Betta Splendens Pair"]);
    }

    #[test]
    fn test_filters_combine() {
        let mut catalog = CatalogController::new(sample(), MemoryBagStore::new());
        let view = catalog.filter(CatalogFilters {
            search: String::new(),
            category: Filter::Only(Category::from("freshwater")),
            bucket: Filter::Only(PriceBucket::from("mid-range")),
        });

        assert_eq!(names(&view), vec!["Tiger Oscar", "Betta Splendens Pair"]);
    }

    #[test]
    fn test_sort_by_price_both_directions() {
        let products = vec![
            product("Oscar", "₹1,200", "freshwater", "mid-range"),
            product("Betta", "₹500", "freshwater", "budget"),
        ];
        let mut catalog = CatalogController::new(products, MemoryBagStore::new());

        let ascending = catalog.sort_by(SortOrder::LowHigh);
        let prices: Vec<Money> = ascending.cards.iter().map(|c| c.price).collect();
        assert_eq!(prices, vec![Money::from_rupees(500), Money::from_rupees(1200)]);

        let descending = catalog.sort_by(SortOrder::HighLow);
        let prices: Vec<Money> = descending.cards.iter().map(|c| c.price).collect();
        assert_eq!(prices, vec![Money::from_rupees(1200), Money::from_rupees(500)]);
    }

    #[test]
    fn test_sort_applies_only_to_visible_cards_and_keeps_indices() {
        let mut catalog = CatalogController::new(sample(), MemoryBagStore::new());
        catalog.filter(CatalogFilters::from_inputs("", "freshwater", "all"));
        let view = catalog.sort_by(SortOrder::Name);

        assert_eq!(
            names(&view),
            vec!["Betta Splendens Pair", "Halfmoon Betta", "Tiger Oscar"]
        );
        let indices: Vec<usize> = view.cards.iter().map(|c| c.card).collect();
        assert_eq!(indices, vec![2, 1, 0]);
    }

    #[test]
    fn test_refiltering_keeps_sort() {
        let mut catalog = CatalogController::new(sample(), MemoryBagStore::new());
        catalog.sort_by(SortOrder::HighLow);
        let view = catalog.filter(CatalogFilters::from_inputs("", "freshwater", "all"));

        assert_eq!(
            names(&view),
            vec!["Tiger Oscar", "Betta Splendens Pair", "Halfmoon Betta"]
        );
    }

    #[tokio::test]
    async fn test_add_same_card_twice_merges() {
        let store = MemoryBagStore::new();
        let catalog = CatalogController::new(sample(), &store);

        catalog.add_to_bag(1).await.unwrap();
        let added = catalog.add_to_bag(1).await.unwrap();

        assert_eq!(added.quantity, 2);
        assert_eq!(added.bag_count, 2);
        let bag = store.get().await.unwrap();
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.items()[0].name, "Halfmoon Betta");
        assert_eq!(bag.items()[0].price, Money::from_rupees(500));
    }

    #[tokio::test]
    async fn test_add_distinct_cards_appends() {
        let store = MemoryBagStore::new();
        let catalog = CatalogController::new(sample(), &store);

        catalog.add_to_bag(0).await.unwrap();
        let added = catalog.add_to_bag(3).await.unwrap();

        assert_eq!(added.quantity, 1);
        assert_eq!(store.get().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_add_copies_display_fields() {
        let store = MemoryBagStore::new();
        let catalog = CatalogController::new(sample(), &store);
        catalog.add_to_bag(3).await.unwrap();

        let bag = store.get().await.unwrap();
        let line = &bag.items()[0];
        assert_eq!(line.image, "/img/Clownfish.jpg");
        assert_eq!(line.description, "Clownfish description");
    }

    #[tokio::test]
    async fn test_add_unknown_card() {
        let store = MemoryBagStore::new();
        let catalog = CatalogController::new(sample(), &store);

        let err = catalog.add_to_bag(42).await.unwrap_err();
        assert!(matches!(err, CatalogError::UnknownCard(42)));
        assert!(store.raw().is_none());
    }

    #[tokio::test]
    async fn test_add_updates_count_subscribers() {
        let store = MemoryBagStore::new();
        let count = store.subscribe();
        let catalog = CatalogController::new(sample(), &store);

        catalog.add_to_bag(0).await.unwrap();
        catalog.add_to_bag(0).await.unwrap();

        assert_eq!(count.borrow().item_count(), 2);
    }

    #[tokio::test]
    async fn test_add_merges_into_existing_stored_bag() {
        let store = MemoryBagStore::with_raw(
            r#"[{"name":"Halfmoon Betta","price":"₹500","image":"x","description":"y","quantity":3}]"#,
        );
        let catalog = CatalogController::new(sample(), &store);

        let added = catalog.add_to_bag(1).await.unwrap();
        assert_eq!(added.quantity, 4);
    }
}
