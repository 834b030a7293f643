use crate::shared::infrastructure::key_value_storage::{
    KeyValueStorage, StorageError, check_quota,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryKeyValueStorage {
    items: RwLock<HashMap<String, serde_json::Value>>,
    quota_bytes_per_item: Option<usize>,
    is_offline: AtomicBool,
    set_calls: AtomicUsize,
}

impl InMemoryKeyValueStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes_per_item: usize) -> Self {
        Self {
            quota_bytes_per_item: Some(quota_bytes_per_item),
            ..Self::default()
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.is_offline.store(offline, Ordering::SeqCst);
    }

    /// Number of successful writes since creation.
    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub async fn seed(&self, key: &str, value: serde_json::Value) {
        self.items.write().await.insert(key.to_string(), value);
    }

    fn ensure_online(&self) -> Result<(), StorageError> {
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("in-memory storage offline".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl KeyValueStorage for InMemoryKeyValueStorage {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        self.ensure_online()?;
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StorageError> {
        self.ensure_online()?;
        check_quota(key, &value, self.quota_bytes_per_item)?;
        self.items.write().await.insert(key.to_string(), value);
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
