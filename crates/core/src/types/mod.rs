//! Core types for Tidepool.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod bag;
pub mod catalog;
pub mod money;
pub mod summary;

pub use bag::{Adjustment, Bag, BagItem};
pub use catalog::{CatalogFilters, Category, Filter, PriceBucket, Product, SortOrder};
pub use money::{Money, MoneyError};
pub use summary::{FLAT_DELIVERY_FEE, FREE_DELIVERY_THRESHOLD, OrderSummary};
