use crate::modules::watch_time::core::ports::{StoreError, WatchTimeStore};
use crate::modules::watch_time::use_cases::summarize_watch_time::summary::{
    SummaryState, summarize,
};
use std::sync::Arc;

/// Reads one full snapshot per activation; there is no live subscription to store changes.
pub struct SummarizeWatchTimeHandler<TStore>
where
    TStore: WatchTimeStore + ?Sized,
{
    store: Arc<TStore>,
}

impl<TStore> SummarizeWatchTimeHandler<TStore>
where
    TStore: WatchTimeStore + ?Sized,
{
    pub fn new(store: Arc<TStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self) -> Result<SummaryState, StoreError> {
        let record = self.store.get().await?;
        Ok(summarize(&record))
    }
}

#[cfg(test)]
mod summarize_watch_time_handler_tests {
    use super::*;
    use crate::modules::watch_time::adapters::outbound::key_value_watch_time_store::KeyValueWatchTimeStore;
    use crate::shared::infrastructure::key_value_storage::in_memory::InMemoryKeyValueStorage;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn it_should_summarize_the_current_snapshot() {
        let store = Arc::new(KeyValueWatchTimeStore::new(Arc::new(
            InMemoryKeyValueStorage::new(),
        )));
        let handler = SummarizeWatchTimeHandler::new(store.clone());
        assert_eq!(handler.handle().await.unwrap(), SummaryState::Empty);

        store.merge_increment("A", 100).await.unwrap();
        assert!(matches!(
            handler.handle().await.unwrap(),
            SummaryState::Populated {
                total_seconds: 100,
                ..
            }
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_when_the_store_cannot_be_read() {
        let storage = Arc::new(InMemoryKeyValueStorage::new());
        storage.set_offline(true);
        let handler =
            SummarizeWatchTimeHandler::new(Arc::new(KeyValueWatchTimeStore::new(storage)));
        assert!(matches!(
            handler.handle().await,
            Err(StoreError::ReadFailure(_))
        ));
    }
}
