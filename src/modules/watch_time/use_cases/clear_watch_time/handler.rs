// Clear handler: applies the two-step confirmation before emptying the store.
//
// Responsibilities
// - Hold the confirmation state for one surface (the popup, or one CLI invocation).
// - Only a confirmed press reaches the store. There is no undo.

use crate::modules::watch_time::core::clear_confirmation::{ClearConfirmation, ClearPress};
use crate::modules::watch_time::core::ports::{StoreError, WatchTimeStore};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Armed { window: Duration },
    Cleared,
}

pub struct ClearWatchTimeHandler<TStore>
where
    TStore: WatchTimeStore + ?Sized,
{
    store: Arc<TStore>,
    confirmation: Mutex<ClearConfirmation>,
}

impl<TStore> ClearWatchTimeHandler<TStore>
where
    TStore: WatchTimeStore + ?Sized,
{
    pub fn new(store: Arc<TStore>, confirmation: ClearConfirmation) -> Self {
        Self {
            store,
            confirmation: Mutex::new(confirmation),
        }
    }

    pub async fn press(&self, now: Instant) -> Result<ClearOutcome, StoreError> {
        let mut confirmation = self.confirmation.lock().await;
        match confirmation.press(now) {
            ClearPress::Armed { .. } => Ok(ClearOutcome::Armed {
                window: confirmation.window(),
            }),
            ClearPress::Confirmed => {
                drop(confirmation);
                self.store.clear().await?;
                tracing::info!("watch time cleared");
                Ok(ClearOutcome::Cleared)
            }
        }
    }

    pub async fn label(&self, now: Instant) -> &'static str {
        self.confirmation.lock().await.label(now)
    }

    pub async fn time_left(&self, now: Instant) -> Option<Duration> {
        self.confirmation.lock().await.time_left(now)
    }
}
