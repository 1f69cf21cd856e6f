//! Command implementations.
//!
//! Rendering is kept apart from printing so the output can be tested.

pub mod bag;
pub mod catalog;
pub mod checkout;

use tidepool_storefront::store::{BagStore, FileBagStore};

/// Bag count indicator line, empty when the bag is.
fn bag_count_line(store: &FileBagStore) -> Option<String> {
    let count = store.subscribe().borrow().item_count();
    (count > 0).then(|| format!("Bag: {count} item(s)"))
}

#[allow(clippy::print_stdout)]
fn print_bag_count(store: &FileBagStore) {
    if let Some(line) = bag_count_line(store) {
        println!("{line}");
    }
}
