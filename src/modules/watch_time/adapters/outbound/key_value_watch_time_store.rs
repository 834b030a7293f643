// WatchTimeStore over a KeyValueStorage.
//
// Responsibilities
// - Read the namespaced record, defaulting to empty when nothing is stored or the
//   stored shape is malformed.
// - Merge increments by read-modify-write of the whole record.
// - Serialize merges issued from this process so the sampler and the HTTP surface
//   never interleave their own read-modify-write cycles.

use crate::modules::watch_time::core::ports::{StoreError, WatchTimeStore};
use crate::modules::watch_time::core::record::{WATCH_TIME_KEY, WatchTimeRecord};
use crate::shared::infrastructure::key_value_storage::KeyValueStorage;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct KeyValueWatchTimeStore<TStorage>
where
    TStorage: KeyValueStorage + ?Sized,
{
    storage: Arc<TStorage>,
    merge_lock: Mutex<()>,
}

impl<TStorage> KeyValueWatchTimeStore<TStorage>
where
    TStorage: KeyValueStorage + ?Sized,
{
    pub fn new(storage: Arc<TStorage>) -> Self {
        Self {
            storage,
            merge_lock: Mutex::new(()),
        }
    }

    async fn read(&self) -> Result<WatchTimeRecord, StoreError> {
        let stored = self
            .storage
            .get(WATCH_TIME_KEY)
            .await
            .map_err(StoreError::ReadFailure)?;

        let Some(stored) = stored else {
            return Ok(WatchTimeRecord::new());
        };

        match WatchTimeRecord::decode(&stored) {
            Ok(decoded) => {
                if !decoded.skipped_entries.is_empty() {
                    tracing::warn!(
                        skipped = ?decoded.skipped_entries,
                        "ignoring watch time entries without a non-negative number of seconds"
                    );
                }
                Ok(decoded.record)
            }
            Err(e) => {
                tracing::warn!("{e}; reading watch time as empty");
                Ok(WatchTimeRecord::new())
            }
        }
    }

    async fn write(&self, record: &WatchTimeRecord) -> Result<(), StoreError> {
        self.storage
            .set(WATCH_TIME_KEY, record.to_stored())
            .await
            .map_err(StoreError::WriteFailure)
    }
}

#[async_trait::async_trait]
impl<TStorage> WatchTimeStore for KeyValueWatchTimeStore<TStorage>
where
    TStorage: KeyValueStorage + ?Sized,
{
    async fn get(&self) -> Result<WatchTimeRecord, StoreError> {
        self.read().await
    }

    async fn merge_increment(&self, channel: &str, seconds: u64) -> Result<u64, StoreError> {
        let _guard = self.merge_lock.lock().await;
        let mut record = self.read().await?;
        let total = record.add(channel, seconds);
        self.write(&record).await?;
        Ok(total)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.merge_lock.lock().await;
        self.write(&WatchTimeRecord::new()).await
    }
}

#[cfg(test)]
mod key_value_watch_time_store_tests {
    use super::*;
    use crate::shared::infrastructure::key_value_storage::StorageError;
    use crate::shared::infrastructure::key_value_storage::in_memory::InMemoryKeyValueStorage;
    use rstest::{fixture, rstest};
    use serde_json::json;

    type BeforeEachReturn = (
        Arc<InMemoryKeyValueStorage>,
        KeyValueWatchTimeStore<InMemoryKeyValueStorage>,
    );

    #[fixture]
    fn before_each() -> BeforeEachReturn {
        let storage = Arc::new(InMemoryKeyValueStorage::new());
        let store = KeyValueWatchTimeStore::new(storage.clone());
        (storage, store)
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_read_an_empty_record_when_nothing_is_stored(before_each: BeforeEachReturn) {
        let (_, store) = before_each;
        assert!(store.get().await.unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_add_consecutive_increments(before_each: BeforeEachReturn) {
        let (_, store) = before_each;
        store.merge_increment("Lofi Girl", 10).await.unwrap();
        let total = store.merge_increment("Lofi Girl", 25).await.unwrap();
        assert_eq!(total, 35);
        assert_eq!(store.get().await.unwrap().seconds_for("Lofi Girl"), 35);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_keep_other_channels_untouched(before_each: BeforeEachReturn) {
        let (_, store) = before_each;
        store.merge_increment("A", 10).await.unwrap();
        store.merge_increment("B", 20).await.unwrap();
        let record = store.get().await.unwrap();
        assert_eq!(record.seconds_for("A"), 10);
        assert_eq!(record.seconds_for("B"), 20);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_persist_the_versioned_envelope(before_each: BeforeEachReturn) {
        let (storage, store) = before_each;
        store.merge_increment("A", 10).await.unwrap();
        assert_eq!(
            storage.get(WATCH_TIME_KEY).await.unwrap(),
            Some(json!({"version": 1, "channels": {"A": 10}}))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_empty_the_record_on_clear(before_each: BeforeEachReturn) {
        let (_, store) = before_each;
        store.merge_increment("A", 10).await.unwrap();
        store.merge_increment("B", 10).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.get().await.unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_migrate_a_legacy_record_on_the_next_merge(before_each: BeforeEachReturn) {
        let (storage, store) = before_each;
        storage.seed(WATCH_TIME_KEY, json!({"A": 30, "B": 40})).await;
        store.merge_increment("A", 10).await.unwrap();
        assert_eq!(
            storage.get(WATCH_TIME_KEY).await.unwrap(),
            Some(json!({"version": 1, "channels": {"A": 40, "B": 40}}))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_read_a_malformed_record_as_empty(before_each: BeforeEachReturn) {
        let (storage, store) = before_each;
        storage.seed(WATCH_TIME_KEY, json!(["not", "a", "map"])).await;
        assert!(store.get().await.unwrap().is_empty());
        assert_eq!(store.merge_increment("A", 10).await.unwrap(), 10);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_report_a_read_failure_while_storage_is_offline(
        before_each: BeforeEachReturn,
    ) {
        let (storage, store) = before_each;
        storage.set_offline(true);
        assert!(matches!(
            store.get().await,
            Err(StoreError::ReadFailure(StorageError::Unavailable(_)))
        ));
        assert!(matches!(
            store.merge_increment("A", 10).await,
            Err(StoreError::ReadFailure(_))
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_report_a_write_failure_when_the_quota_is_exceeded() {
        let storage = Arc::new(InMemoryKeyValueStorage::with_quota(64));
        let store = KeyValueWatchTimeStore::new(storage.clone());
        store.merge_increment("A", 10).await.unwrap();
        let result = store.merge_increment(&"x".repeat(128), 10).await;
        assert!(matches!(
            result,
            Err(StoreError::WriteFailure(StorageError::QuotaExceeded { .. }))
        ));
        assert_eq!(store.get().await.unwrap().seconds_for("A"), 10);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_not_lose_increments_merged_concurrently_in_one_process(
        before_each: BeforeEachReturn,
    ) {
        let (_, store) = before_each;
        let store = Arc::new(store);
        let merges = (0..8).map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.merge_increment("A", 10).await })
        });
        for merge in merges.collect::<Vec<_>>() {
            merge.await.unwrap().unwrap();
        }
        assert_eq!(store.get().await.unwrap().seconds_for("A"), 80);
    }
}
