use crate::modules::watch_time::adapters::outbound::key_value_watch_time_store::KeyValueWatchTimeStore;
use crate::modules::watch_time::adapters::outbound::pushed_page_state::PushedPageState;
use crate::shared::infrastructure::key_value_storage::in_memory::InMemoryKeyValueStorage;
use crate::shell::state::AppState;
use std::sync::Arc;
use tokio::time::Duration;

/// AppState over in-memory adapters, with handles to seed and break them.
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<KeyValueWatchTimeStore<InMemoryKeyValueStorage>>,
    pub storage: Arc<InMemoryKeyValueStorage>,
}

pub fn make_test_app() -> TestApp {
    let storage = Arc::new(InMemoryKeyValueStorage::new());
    let store = Arc::new(KeyValueWatchTimeStore::new(storage.clone()));
    let page_state = Arc::new(PushedPageState::new(Duration::from_secs(30)));
    TestApp {
        state: AppState::new(page_state, store.clone()),
        store,
        storage,
    }
}
