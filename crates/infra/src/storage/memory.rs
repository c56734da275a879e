//! In-process key-value store

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use vitalscope_core::{KeyValueStore, UpdateFn};
use vitalscope_domain::Result;

/// Key-value store that lives only as long as the process
///
/// `update` holds the write lock across the mutator, so concurrent updates
/// of the same key never lose writes.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    async fn update(&self, key: &str, mutator: UpdateFn) -> Result<()> {
        let mut entries = self.entries.write();
        let next = mutator(entries.get(key).cloned())?;
        entries.insert(key.to_string(), next);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use vitalscope_domain::VitalScopeError;

    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get("metrics_data").await.unwrap(), None);

        store.set("metrics_data", "[]".to_string()).await.unwrap();
        assert_eq!(store.get("metrics_data").await.unwrap().as_deref(), Some("[]"));

        store.remove("metrics_data").await.unwrap();
        store.remove("metrics_data").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn failed_mutator_keeps_previous_value() {
        let store = MemoryKeyValueStore::new();
        store.set("k", "old".to_string()).await.unwrap();

        let result = store
            .update("k", Box::new(|_| Err(VitalScopeError::Internal("boom".to_string()))))
            .await;

        assert!(result.is_err());
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn update_sees_current_value() {
        let store = MemoryKeyValueStore::new();
        store
            .update("n", Box::new(|current| Ok(format!("{}1", current.unwrap_or_default()))))
            .await
            .unwrap();
        store
            .update("n", Box::new(|current| Ok(format!("{}2", current.unwrap_or_default()))))
            .await
            .unwrap();

        assert_eq!(store.get("n").await.unwrap().as_deref(), Some("12"));
        assert_eq!(store.len(), 1);
    }
}
