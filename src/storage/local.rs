//! Local filesystem key-value storage.
//!
//! ## Storage Layout
//!
//! ```text
//! {root}/
//! └── local_storage.json    # {"dongList": "[...]", "selectedDong": "역삼동"}
//! ```
//!
//! Every batch rewrites the whole file through a temp file and a rename.
//! Batches on one `LocalStorage` (and its clones) are serialized, so
//! overlapping writers finish in turn and the last one wins.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::storage::KeyValueStore;

/// File name of the key-value document.
pub const STORAGE_FILE: &str = "local_storage.json";

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> PathBuf {
        self.root_dir.join(STORAGE_FILE)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Unique per write, across every handle in this process
        let tmp = path.with_extension(format!(
            "{}.{}.tmp",
            std::process::id(),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::Io(e));
        }
        Ok(())
    }

    /// Read the whole document, empty if the file doesn't exist.
    async fn read_map(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read(self.path()).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl KeyValueStore for LocalStorage {
    async fn get_items(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        let map = self.read_map().await?;
        Ok(keys.iter().map(|key| map.get(*key).cloned()).collect())
    }

    async fn set_items(&self, items: &[(&str, String)]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        for (key, value) in items {
            map.insert(key.to_string(), value.clone());
        }

        let bytes = serde_json::to_vec_pretty(&map)?;
        self.write_bytes(&bytes).await?;
        log::debug!("Wrote {} key(s) to {}", items.len(), self.path().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SelectedLocation;
    use crate::storage::SelectionStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage
            .set_items(&[("selectedDong", "역삼동".to_string())])
            .await
            .unwrap();
        let value = storage.get_item("selectedDong").await.unwrap();
        assert_eq!(value.as_deref(), Some("역삼동"));
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("nested"));

        let values = storage.get_items(&["a", "b"]).await.unwrap();
        assert_eq!(values, vec![None, None]);
    }

    #[tokio::test]
    async fn test_batches_merge_with_existing_keys() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage
            .set_items(&[("a", "1".to_string()), ("b", "2".to_string())])
            .await
            .unwrap();
        storage.set_items(&[("b", "3".to_string())]).await.unwrap();

        let values = storage.get_items(&["a", "b"]).await.unwrap();
        assert_eq!(values, vec![Some("1".to_string()), Some("3".to_string())]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_saves_all_succeed() {
        let tmp = TempDir::new().unwrap();
        let store = SelectionStore::new(Arc::new(LocalStorage::new(tmp.path())));
        let names = ["역삼동", "신장동", "삼성동", "망월동"];

        let mut handles = Vec::new();
        for i in 0..64 {
            let store = store.clone();
            let name = names[i % names.len()];
            handles.push(tokio::spawn(async move {
                store.save(&SelectedLocation::from_neighborhood(name)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let location = store.load().await.unwrap();
        assert!(names.contains(&location.selected_neighborhood.as_str()));
        assert_eq!(
            location,
            SelectedLocation::from_neighborhood(location.selected_neighborhood.clone())
        );
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        std::fs::write(storage.path(), b"{ not json").unwrap();

        assert!(matches!(
            storage.get_item("selectedDong").await,
            Err(AppError::Json(_))
        ));
    }
}
