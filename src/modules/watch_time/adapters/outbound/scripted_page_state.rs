// In-memory PageStateProvider driven directly by the caller.
//
// Used by the end-to-end flow tests and for demos without a browser bridge: the caller
// decides which page is showing, and can make the provider fail, between ticks.

use crate::modules::watch_time::core::page::PageSnapshot;
use crate::modules::watch_time::core::ports::{PageStateError, PageStateProvider};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Default)]
pub struct ScriptedPageState {
    showing: RwLock<Option<PageSnapshot>>,
    is_failing: AtomicBool,
}

impl ScriptedPageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn show(&self, url: impl Into<String>, html: impl Into<String>) {
        *self.showing.write().await = Some(PageSnapshot::new(url, html, Instant::now()));
    }

    pub async fn close(&self) {
        *self.showing.write().await = None;
    }

    pub fn set_failing(&self, failing: bool) {
        self.is_failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl PageStateProvider for ScriptedPageState {
    async fn current_page(&self) -> Result<Option<PageSnapshot>, PageStateError> {
        if self.is_failing.load(Ordering::SeqCst) {
            return Err(PageStateError::Unavailable(
                "scripted page state failing".to_string(),
            ));
        }
        Ok(self.showing.read().await.clone())
    }
}
