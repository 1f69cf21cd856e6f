//! Persisted bag state.
//!
//! The bag is the only state shared between the catalog, bag and checkout
//! controllers. Each controller receives a [`BagStore`] instead of reaching
//! for storage directly, so every read and write goes through one accessor.
//!
//! # Implementations
//!
//! - [`MemoryBagStore`] - raw JSON held in memory (tests, embedding)
//! - [`FileBagStore`] - JSON file on disk (terminal front end)
//! - [`SessionBagStore`] - visitor session (HTTP front end)
//!
//! Every implementation stores the whole bag as one JSON array under
//! [`BAG_KEY`]. Absent or malformed data reads as an empty bag. There is no
//! locking: concurrent writers overwrite each other and the last write wins.

mod file;
mod memory;
mod session;

use std::future::Future;

use thiserror::Error;
use tidepool_core::Bag;
use tokio::sync::watch;

pub use file::FileBagStore;
pub use memory::MemoryBagStore;
pub use session::SessionBagStore;

/// Key the serialized bag is stored under.
pub const BAG_KEY: &str = "shoppingBag";

/// Errors raised by the storage backing a [`BagStore`].
///
/// Malformed stored data is not an error; it reads as an empty bag.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the bag file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bag could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Accessor for the persisted bag.
pub trait BagStore: Send + Sync {
    /// Read the persisted bag. Absent or malformed data is an empty bag.
    fn get(&self) -> impl Future<Output = Result<Bag, StoreError>> + Send;

    /// Replace the persisted bag.
    fn set(&self, bag: &Bag) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove the persisted bag entirely.
    fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Watch the bag as seen through this store.
    ///
    /// The receiver is updated on every `get`, `set` and `clear` that changes
    /// the bag, which is what item-count indicators hang off.
    fn subscribe(&self) -> watch::Receiver<Bag>;
}

impl<S: BagStore> BagStore for &S {
    fn get(&self) -> impl Future<Output = Result<Bag, StoreError>> + Send {
        (**self).get()
    }

    fn set(&self, bag: &Bag) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).set(bag)
    }

    fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).clear()
    }

    fn subscribe(&self) -> watch::Receiver<Bag> {
        (**self).subscribe()
    }
}

/// Change feed shared by the store implementations.
#[derive(Debug)]
pub(crate) struct BagWatch {
    tx: watch::Sender<Bag>,
}

impl BagWatch {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(Bag::new());
        Self { tx }
    }

    /// Publish `bag` if it differs from the last published value.
    pub(crate) fn publish(&self, bag: &Bag) {
        self.tx.send_if_modified(|current| {
            if current == bag {
                false
            } else {
                current.clone_from(bag);
                true
            }
        });
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Bag> {
        self.tx.subscribe()
    }
}

impl Default for BagWatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a stored bag, treating malformed data as empty.
pub(crate) fn decode_bag(raw: &str) -> Bag {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "Discarding malformed stored bag");
        Bag::new()
    })
}
