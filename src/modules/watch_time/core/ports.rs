// Ports define what the watch time core needs from the outside world.
//
// - PageStateProvider: the current page, or None when no page context is attached.
// - WatchTimeStore: cumulative per-channel totals with read, merge-update and clear.
//
// Adapters implement these traits in adapters/outbound.

use crate::modules::watch_time::core::page::PageSnapshot;
use crate::modules::watch_time::core::record::WatchTimeRecord;
use crate::shared::infrastructure::key_value_storage::StorageError;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageStateError {
    #[error("page state unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait PageStateProvider: Send + Sync {
    async fn current_page(&self) -> Result<Option<PageSnapshot>, PageStateError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("watch time read failed: {0}")]
    ReadFailure(#[source] StorageError),

    #[error("watch time write failed: {0}")]
    WriteFailure(#[source] StorageError),
}

/// Cumulative watch time per channel.
///
/// `merge_increment` is a read-modify-write over the whole record. It is not serializable
/// against another writer sharing the same storage (a second process or device): two
/// interleaved merges can lose one increment. A compare-and-swap on the storage port would
/// be needed to close that gap.
#[async_trait]
pub trait WatchTimeStore: Send + Sync {
    /// Never fails into a missing state: nothing stored reads as an empty record.
    async fn get(&self) -> Result<WatchTimeRecord, StoreError>;

    /// Adds `seconds` to the channel and returns the channel's new total.
    async fn merge_increment(&self, channel: &str, seconds: u64) -> Result<u64, StoreError>;

    async fn clear(&self) -> Result<(), StoreError>;
}
