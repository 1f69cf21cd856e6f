//! In-memory bag store.

use std::sync::{Mutex, PoisonError};

use tidepool_core::Bag;
use tokio::sync::watch;

use super::{BagStore, BagWatch, StoreError, decode_bag};

/// Bag store holding the serialized bag in memory.
///
/// Keeps the raw JSON rather than a decoded [`Bag`] so that it behaves like
/// the other stores: every `get` decodes, and malformed data reads as empty.
#[derive(Debug, Default)]
pub struct MemoryBagStore {
    raw: Mutex<Option<String>>,
    watch: BagWatch,
}

impl MemoryBagStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with raw serialized data.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
            watch: BagWatch::new(),
        }
    }

    /// Returns the raw serialized bag, or `None` if nothing is stored.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.raw
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, value: Option<String>) {
        *self.raw.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

impl BagStore for MemoryBagStore {
    async fn get(&self) -> Result<Bag, StoreError> {
        let bag = self.raw().map_or_else(Bag::new, |raw| decode_bag(&raw));
        self.watch.publish(&bag);
        Ok(bag)
    }

    async fn set(&self, bag: &Bag) -> Result<(), StoreError> {
        let raw = serde_json::to_string(bag)?;
        self.replace(Some(raw));
        self.watch.publish(bag);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.replace(None);
        self.watch.publish(&Bag::new());
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Bag> {
        self.watch.subscribe()
    }
}
