//! In-process key-value store for tests and `--ephemeral` runs.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::Result;
use crate::storage::KeyValueStore;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStorage {
    async fn get_items(&self, keys: &[&str]) -> Result<Vec<Option<String>>> {
        let items = self.items();
        Ok(keys.iter().map(|key| items.get(*key).cloned()).collect())
    }

    async fn set_items(&self, entries: &[(&str, String)]) -> Result<()> {
        let mut items = self.items();
        for (key, value) in entries {
            items.insert(key.to_string(), value.clone());
        }
        Ok(())
    }
}
