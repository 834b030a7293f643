// Sampler runner drives the sample handler on a fixed interval.
//
// Purpose
// - Poll the page on a timer rather than subscribe to page events: in-page navigation on
//   the host does not fire lifecycle events that can be hooked reliably.
//
// Responsibilities
// - Run one early sample after a short delay, then one per interval from activation.
// - Thread SamplerState from tick to tick.
// - Never overlap ticks; a late tick delays the schedule instead of bursting.
// - Stop when the cancellation token fires.

use crate::modules::watch_time::core::ports::{PageStateProvider, WatchTimeStore};
use crate::modules::watch_time::use_cases::sample_page::decision::SamplerState;
use crate::modules::watch_time::use_cases::sample_page::handler::SamplePageHandler;
use std::sync::Arc;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

pub async fn run_sampler<TPageState, TStore>(
    handler: Arc<SamplePageHandler<TPageState, TStore>>,
    initial_delay: Duration,
    cancel: CancellationToken,
) where
    TPageState: PageStateProvider + ?Sized,
    TStore: WatchTimeStore + ?Sized,
{
    let period = handler.policy().interval;
    let activated_at = Instant::now();
    let mut ticker = tokio::time::interval_at(activated_at + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        interval_secs = period.as_secs(),
        initial_delay_ms = initial_delay.as_millis() as u64,
        "sampler started"
    );

    let mut state = SamplerState::default();

    if initial_delay < period {
        tokio::select! {
            _ = tokio::time::sleep_until(activated_at + initial_delay) => {
                state = handler.handle(state, Instant::now()).await.0;
            }
            _ = cancel.cancelled() => {
                tracing::info!("sampler shutting down");
                return;
            }
        }
    } else {
        tracing::debug!(
            initial_delay_ms = initial_delay.as_millis() as u64,
            interval_secs = period.as_secs(),
            "initial delay is not shorter than the interval, skipping the early sample"
        );
    }

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                state = handler.handle(state, Instant::now()).await.0;
            }
            _ = cancel.cancelled() => {
                tracing::info!("sampler shutting down");
                break;
            }
        }
    }
}
