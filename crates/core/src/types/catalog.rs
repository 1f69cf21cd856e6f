//! Catalog entries, filters and sort orders.

use core::cmp::Ordering;
use core::fmt;

use serde::{Deserialize, Serialize};

use super::bag::BagItem;
use super::money::Money;

/// Filter value that lets every entry through.
pub const ALL: &str = "all";

/// Macro to define a string label used for exact-match filtering.
///
/// Creates a newtype wrapper around `String` with `#[serde(transparent)]`,
/// `Display`, `as_str()` and `From<String>` / `From<&str>`.
macro_rules! define_label {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new label.
            #[must_use]
            pub fn new(label: impl Into<String>) -> Self {
                Self(label.into())
            }

            /// Returns the label as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(label: String) -> Self {
                Self(label)
            }
        }

        impl From<&str> for $name {
            fn from(label: &str) -> Self {
                Self(label.to_owned())
            }
        }
    };
}

define_label!(
    /// Product category (e.g. `freshwater`, `marine`).
    Category
);

define_label!(
    /// Coarse price range label (e.g. `budget`, `premium`).
    ///
    /// Independent from the numeric price; the catalog assigns it.
    PriceBucket
);

/// An exact-match filter with an "all" passthrough.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Filter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: From<String>> Filter<T> {
    /// Parse a filter input. `all` and the empty string mean [`Filter::All`].
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() || input == ALL {
            Self::All
        } else {
            Self::Only(T::from(input.to_owned()))
        }
    }
}

impl<T: PartialEq> Filter<T> {
    /// Returns `true` if `value` passes the filter.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }
}

/// A catalog entry as listed on the shop page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: Money,
    pub image: String,
    pub description: String,
    pub category: Category,
    pub bucket: PriceBucket,
}

impl Product {
    /// The bag line this product becomes when added.
    #[must_use]
    pub fn to_bag_item(&self) -> BagItem {
        BagItem::new(
            self.name.clone(),
            self.price,
            self.image.clone(),
            self.description.clone(),
        )
    }
}

/// The three AND-combined catalog filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilters {
    /// Case-insensitive substring of the product name. Empty matches all.
    pub search: String,
    pub category: Filter<Category>,
    pub bucket: Filter<PriceBucket>,
}

impl CatalogFilters {
    /// Build filters from raw input values.
    #[must_use]
    pub fn from_inputs(search: &str, category: &str, bucket: &str) -> Self {
        Self {
            search: search.to_owned(),
            category: Filter::parse(category),
            bucket: Filter::parse(bucket),
        }
    }

    /// Returns `true` if `product` passes all three filters.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let term = self.search.to_lowercase();
        product.name.to_lowercase().contains(&term)
            && self.category.matches(&product.category)
            && self.bucket.matches(&product.bucket)
    }
}

/// Display order of the visible catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Default,
    /// Ascending numeric price.
    LowHigh,
    /// Descending numeric price.
    HighLow,
    /// Case-insensitive name.
    Name,
}

impl SortOrder {
    /// Parse a sort input. Unknown values keep catalog order.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "low-high" => Self::LowHigh,
            "high-low" => Self::HighLow,
            "name" => Self::Name,
            _ => Self::Default,
        }
    }

    /// Compare two products under this order.
    #[must_use]
    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Default => Ordering::Equal,
            Self::LowHigh => a.price.cmp(&b.price),
            Self::HighLow => b.price.cmp(&a.price),
            Self::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn product(name: &str, price: i64, category: &str, bucket: &str) -> Product {
        Product {
            name: name.to_string(),
            price: Money::from_rupees(price),
            image: String::new(),
            description: String::new(),
            category: Category::from(category),
            bucket: PriceBucket::from(bucket),
        }
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(Filter::<Category>::parse("all"), Filter::All);
        assert_eq!(Filter::<Category>::parse(""), Filter::All);
        assert_eq!(
            Filter::<Category>::parse("marine"),
            Filter::Only(Category::from("marine"))
        );
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let filters = CatalogFilters::from_inputs("BET", "all", "all");
        assert!(filters.matches(&product("Halfmoon Betta", 500, "freshwater", "budget")));
        assert!(!filters.matches(&product("Guppy", 80, "freshwater", "budget")));
    }

    #[test]
    fn test_filters_are_and_combined() {
        let filters = CatalogFilters::from_inputs("", "marine", "premium");
        assert!(filters.matches(&product("Clownfish", 1800, "marine", "premium")));
        assert!(!filters.matches(&product("Clownfish", 1800, "marine", "budget")));
        assert!(!filters.matches(&product("Oscar", 1200, "freshwater", "premium")));
    }

    #[test]
    fn test_sort_parse_falls_back_to_default() {
        assert_eq!(SortOrder::parse("low-high"), SortOrder::LowHigh);
        assert_eq!(SortOrder::parse("high-low"), SortOrder::HighLow);
        assert_eq!(SortOrder::parse("name"), SortOrder::Name);
        assert_eq!(SortOrder::parse("featured"), SortOrder::Default);
    }

    #[test]
    fn test_sort_by_price() {
        let mut products = vec![
            product("Oscar", 1200, "freshwater", "mid"),
            product("Betta", 500, "freshwater", "budget"),
        ];

        products.sort_by(|a, b| SortOrder::LowHigh.compare(a, b));
        assert_eq!(products[0].price, Money::from_rupees(500));

        products.sort_by(|a, b| SortOrder::HighLow.compare(a, b));
        assert_eq!(products[0].price, Money::from_rupees(1200));
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let mut products = vec![
            product("guppy", 80, "freshwater", "budget"),
            product("Angelfish", 350, "freshwater", "budget"),
        ];
        products.sort_by(|a, b| SortOrder::Name.compare(a, b));
        assert_eq!(products[0].name, "Angelfish");
    }
}
