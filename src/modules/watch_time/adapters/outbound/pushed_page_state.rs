// PageStateProvider fed by the browser bridge.
//
// Purpose
// - Hold the latest page snapshot pushed over HTTP until the sampler reads it.
//
// Responsibilities
// - A snapshot older than max_age reads as "no page": the page context that pushed it is
//   gone or stopped reporting, and time must not be credited on its behalf.
// - detach() drops the snapshot immediately when the bridge reports the page closing.

use crate::modules::watch_time::core::page::PageSnapshot;
use crate::modules::watch_time::core::ports::{PageStateError, PageStateProvider};
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

pub struct PushedPageState {
    latest: RwLock<Option<PageSnapshot>>,
    max_age: Duration,
}

impl PushedPageState {
    pub fn new(max_age: Duration) -> Self {
        Self {
            latest: RwLock::new(None),
            max_age,
        }
    }

    pub async fn push(&self, url: impl Into<String>, html: impl Into<String>) {
        let snapshot = PageSnapshot::new(url, html, Instant::now());
        *self.latest.write().await = Some(snapshot);
    }

    pub async fn detach(&self) {
        *self.latest.write().await = None;
    }
}

#[async_trait::async_trait]
impl PageStateProvider for PushedPageState {
    async fn current_page(&self) -> Result<Option<PageSnapshot>, PageStateError> {
        let guard = self.latest.read().await;
        Ok(guard
            .as_ref()
            .filter(|snapshot| snapshot.captured_at.elapsed() <= self.max_age)
            .cloned())
    }
}
