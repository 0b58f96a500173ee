//! Persistence of the neighborhood selection.
//!
//! The selection lives in a small string key-value store, two keys wide:
//!
//! ```text
//! selectedDong  "역삼동"
//! dongList      "[\"역삼동\",\"삼성동\",\"대치동\",\"청담동\",\"개포동\"]"
//! ```
//!
//! Both keys are always written together in one batch, so readers never see
//! a half-updated record.

pub mod local;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::SelectedLocation;
use crate::neighborhoods;

// Re-export for convenience
pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// Key holding the selected neighborhood name.
pub const SELECTED_KEY: &str = "selectedDong";

/// Key holding the JSON-serialized candidate list.
pub const CANDIDATES_KEY: &str = "dongList";

/// Trait for durable string key-value backends.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read several keys at once, `None` for absent ones.
    async fn get_items(&self, keys: &[&str]) -> Result<Vec<Option<String>>>;

    /// Write several keys as one atomic batch.
    async fn set_items(&self, items: &[(&str, String)]) -> Result<()>;

    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get_items(&[key]).await?.pop().flatten())
    }
}

/// Handle to the persisted [`SelectedLocation`].
#[derive(Clone)]
pub struct SelectionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SelectionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Load the selection, applying defaults for absent keys.
    pub async fn load(&self) -> Result<SelectedLocation> {
        let mut values = self
            .backend
            .get_items(&[SELECTED_KEY, CANDIDATES_KEY])
            .await?
            .into_iter();
        let selected = values.next().flatten();
        let candidates = values.next().flatten();

        let defaults = SelectedLocation::default();
        Ok(SelectedLocation {
            selected_neighborhood: selected.unwrap_or(defaults.selected_neighborhood),
            neighborhood_candidates: candidates
                .map(|raw| decode_candidates(&raw))
                .unwrap_or(defaults.neighborhood_candidates),
        })
    }

    /// Overwrite the whole selection.
    pub async fn save(&self, location: &SelectedLocation) -> Result<()> {
        let candidates = serde_json::to_string(&location.neighborhood_candidates)?;
        self.backend
            .set_items(&[
                (SELECTED_KEY, location.selected_neighborhood.clone()),
                (CANDIDATES_KEY, candidates),
            ])
            .await
    }

    /// Pick one of the current candidates by hand.
    pub async fn select(&self, name: &str) -> Result<SelectedLocation> {
        let mut location = self.load().await?;
        if !location.contains(name) {
            return Err(AppError::validation(format!(
                "'{name}' is not one of the candidates: {}",
                location.neighborhood_candidates.join(", ")
            )));
        }

        location.selected_neighborhood = name.to_string();
        self.save(&location).await?;
        log::info!("Selected neighborhood {}", name);
        Ok(location)
    }
}

fn decode_candidates(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        log::warn!("Stored {} is not a JSON string list ({}); using defaults", CANDIDATES_KEY, e);
        neighborhoods::default_candidates()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (SelectionStore, Arc<MemoryStorage>) {
        let backend = Arc::new(MemoryStorage::new());
        (SelectionStore::new(backend.clone()), backend)
    }

    #[tokio::test]
    async fn test_empty_store_loads_defaults() {
        let (store, _) = store();
        let location = store.load().await.unwrap();
        assert_eq!(location, SelectedLocation::default());
        assert_eq!(location.selected_neighborhood, "내 동네");
        assert_eq!(location.neighborhood_candidates.len(), 8);
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let (store, backend) = store();
        let location = SelectedLocation::from_neighborhood("신장동");
        store.save(&location).await.unwrap();

        assert_eq!(store.load().await.unwrap(), location);
        assert_eq!(
            backend.get_item(SELECTED_KEY).await.unwrap().as_deref(),
            Some("신장동")
        );
        let raw = backend.get_item(CANDIDATES_KEY).await.unwrap().unwrap();
        assert!(raw.starts_with("[\"신장동\""));
    }

    #[tokio::test]
    async fn test_partial_record_fills_missing_key() {
        let (store, backend) = store();
        backend
            .set_items(&[(SELECTED_KEY, "청담동".to_string())])
            .await
            .unwrap();

        let location = store.load().await.unwrap();
        assert_eq!(location.selected_neighborhood, "청담동");
        assert_eq!(
            location.neighborhood_candidates,
            neighborhoods::default_candidates()
        );
    }

    #[tokio::test]
    async fn test_corrupt_candidates_fall_back() {
        let (store, backend) = store();
        backend
            .set_items(&[(CANDIDATES_KEY, "not json".to_string())])
            .await
            .unwrap();

        let location = store.load().await.unwrap();
        assert_eq!(
            location.neighborhood_candidates,
            neighborhoods::default_candidates()
        );
    }

    #[tokio::test]
    async fn test_select_requires_candidate() {
        let (store, _) = store();
        store
            .save(&SelectedLocation::from_neighborhood("역삼동"))
            .await
            .unwrap();

        let location = store.select("대치동").await.unwrap();
        assert_eq!(location.selected_neighborhood, "대치동");
        assert_eq!(location.neighborhood_candidates[0], "역삼동");
        assert_eq!(store.load().await.unwrap(), location);

        assert!(matches!(
            store.select("미사동").await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(store.load().await.unwrap().selected_neighborhood, "대치동");
    }
}
