//! File-backed bag store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tidepool_core::Bag;
use tokio::fs;
use tokio::sync::watch;

use super::{BagStore, BagWatch, StoreError, decode_bag};

/// Bag store persisting the bag as a JSON file.
///
/// Writes go to a sibling temporary file that is renamed over the target,
/// so a reader never sees a half-written bag.
#[derive(Debug)]
pub struct FileBagStore {
    path: PathBuf,
    watch: BagWatch,
}

impl FileBagStore {
    /// Create a store for the bag file at `path`.
    ///
    /// The file and its parent directories are created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            watch: BagWatch::new(),
        }
    }

    /// Path of the bag file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl BagStore for FileBagStore {
    async fn get(&self) -> Result<Bag, StoreError> {
        let bag = match fs::read_to_string(&self.path).await {
            Ok(raw) => decode_bag(&raw),
            Err(e) if e.kind() == ErrorKind::NotFound => Bag::new(),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                tracing::debug!(path = %self.path.display(), "Bag file is not UTF-8");
                Bag::new()
            }
            Err(e) => return Err(e.into()),
        };
        self.watch.publish(&bag);
        Ok(bag)
    }

    async fn set(&self, bag: &Bag) -> Result<(), StoreError> {
        let raw = serde_json::to_vec_pretty(bag)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        fs::write(&temp, raw).await?;
        fs::rename(&temp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), lines = bag.len(), "Bag written");
        self.watch.publish(bag);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.watch.publish(&Bag::new());
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Bag> {
        self.watch.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tidepool_core::{BagItem, Money};

    use super::*;

    fn one_oscar() -> Bag {
        [BagItem::new("Oscar", Money::from_rupees(1200), "", "")]
            .into_iter()
            .collect()
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileBagStore::new(dir.path().join("bag.json"));
        assert!(store.get().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bag.json");
        std::fs::write(&path, "[{\"name\": 1}]").unwrap();

        let store = FileBagStore::new(&path);
        assert!(store.get().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bag.json");
        let store = FileBagStore::new(&path);

        store.set(&one_oscar()).await.unwrap();

        assert!(path.exists());
        assert!(!store.temp_path().exists());
        assert_eq!(store.get().await.unwrap(), one_oscar());
    }

    #[tokio::test]
    async fn test_written_file_is_a_plain_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bag.json");
        FileBagStore::new(&path).set(&one_oscar()).await.unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["price"], "₹1,200");
        assert_eq!(value[0]["quantity"], 1);
    }

    #[tokio::test]
    async fn test_clear_deletes_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bag.json");
        let store = FileBagStore::new(&path);

        store.set(&one_oscar()).await.unwrap();
        store.clear().await.unwrap();
        store.clear().await.unwrap();

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bag.json");
        let first = FileBagStore::new(&path);
        let second = FileBagStore::new(&path);

        first.set(&one_oscar()).await.unwrap();
        second.set(&Bag::new()).await.unwrap();

        assert!(first.get().await.unwrap().is_empty());
    }
}
