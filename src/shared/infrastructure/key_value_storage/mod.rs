// Key-value storage port.
//
// Purpose
// - Model the shared, eventually-synced storage substrate: asynchronous get(key) and
//   set(key, value), quota bounded per item.
//
// Boundaries
// - Callers see success or failure of a whole operation, never a partial write.
// - Concrete media live next to this file (in_memory.rs, json_file.rs).

pub mod in_memory;
pub mod json_file;

use async_trait::async_trait;
use thiserror::Error;

/// Per-item quota of the browser sync storage area the persisted layout mirrors.
pub const DEFAULT_QUOTA_BYTES_PER_ITEM: usize = 8192;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("item '{key}' is {size} bytes, quota is {quota} bytes")]
    QuotaExceeded {
        key: String,
        size: usize,
        quota: usize,
    },

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError>;
    async fn set(&self, key: &str, value: serde_json::Value) -> Result<(), StorageError>;
}

/// Size of an item as the quota sees it: key plus serialized value.
pub fn item_size(key: &str, value: &serde_json::Value) -> Result<usize, StorageError> {
    Ok(key.len() + serde_json::to_vec(value)?.len())
}

pub fn check_quota(
    key: &str,
    value: &serde_json::Value,
    quota: Option<usize>,
) -> Result<(), StorageError> {
    let Some(quota) = quota else {
        return Ok(());
    };
    let size = item_size(key, value)?;
    if size > quota {
        return Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            size,
            quota,
        });
    }
    Ok(())
}
