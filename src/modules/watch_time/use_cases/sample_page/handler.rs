// Sample handler orchestrates one sampler tick.
//
// Responsibilities
// - Read the current page from the provider and run the inspector over it.
// - Call the pure decision function.
// - On Attributable, issue exactly one merge-update and await it before the tick ends.
// - Absorb every failure: a provider failure reads as "no page", a store failure drops the
//   tick's credit. Nothing is queued for retry.

use crate::modules::watch_time::core::inspector::PageInspector;
use crate::modules::watch_time::core::page::PageObservation;
use crate::modules::watch_time::core::ports::{PageStateProvider, WatchTimeStore};
use crate::modules::watch_time::use_cases::sample_page::decide::sample;
use crate::modules::watch_time::use_cases::sample_page::decision::{
    SampleDecision, SamplerState, SamplingPolicy,
};
use std::sync::Arc;
use tokio::time::Instant;

pub struct SamplePageHandler<TPageState, TStore>
where
    TPageState: PageStateProvider + ?Sized,
    TStore: WatchTimeStore + ?Sized,
{
    page_state: Arc<TPageState>,
    store: Arc<TStore>,
    inspector: PageInspector,
    policy: SamplingPolicy,
}

impl<TPageState, TStore> SamplePageHandler<TPageState, TStore>
where
    TPageState: PageStateProvider + ?Sized,
    TStore: WatchTimeStore + ?Sized,
{
    pub fn new(
        page_state: Arc<TPageState>,
        store: Arc<TStore>,
        inspector: PageInspector,
        policy: SamplingPolicy,
    ) -> Self {
        Self {
            page_state,
            store,
            inspector,
            policy,
        }
    }

    pub fn policy(&self) -> &SamplingPolicy {
        &self.policy
    }

    pub async fn handle(
        &self,
        state: SamplerState,
        now: Instant,
    ) -> (SamplerState, SampleDecision) {
        let observation = self.observe().await;
        let previous_channel = state.last_channel.clone();
        let previous_url = state.last_url.clone();
        let (next, decision) = sample(state, observation.as_ref(), &self.policy, now);

        if next.last_url != previous_url {
            tracing::debug!(url = ?next.last_url, "page location changed");
        }

        match &decision {
            SampleDecision::Attributable {
                channel,
                elapsed_seconds,
            } => {
                if previous_channel.as_deref() != Some(channel.as_str()) {
                    tracing::info!(channel = %channel, "watching live broadcast");
                }
                match self.store.merge_increment(channel, *elapsed_seconds).await {
                    Ok(total) => tracing::debug!(
                        channel = %channel,
                        seconds = elapsed_seconds,
                        total,
                        "credited watch time"
                    ),
                    Err(e) => tracing::warn!(
                        channel = %channel,
                        seconds = elapsed_seconds,
                        "dropping tick: {e}"
                    ),
                }
            }
            other => tracing::debug!(decision = ?other, "not attributing"),
        }

        (next, decision)
    }

    async fn observe(&self) -> Option<PageObservation> {
        let snapshot = match self.page_state.current_page().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("{e}; treating the tick as off a watch page");
                None
            }
        };
        snapshot.map(|snapshot| self.inspector.inspect(&snapshot))
    }
}

#[cfg(test)]
mod sample_page_handler_tests {
    use super::*;
    use crate::modules::watch_time::adapters::outbound::key_value_watch_time_store::KeyValueWatchTimeStore;
    use crate::modules::watch_time::adapters::outbound::pushed_page_state::PushedPageState;
    use crate::modules::watch_time::core::inspector::UNKNOWN_CHANNEL;
    use crate::modules::watch_time::core::page::PageSnapshot;
    use crate::modules::watch_time::core::ports::PageStateError;
    use crate::shared::infrastructure::key_value_storage::in_memory::InMemoryKeyValueStorage;
    use crate::tests::fixtures::pages::{
        HOME_URL, OTHER_WATCH_URL, WATCH_URL, live_page, live_page_without_channel, vod_page,
    };
    use rstest::{fixture, rstest};
    use tokio::time::Duration;

    type Store = KeyValueWatchTimeStore<InMemoryKeyValueStorage>;

    struct Harness {
        page_state: Arc<PushedPageState>,
        storage: Arc<InMemoryKeyValueStorage>,
        store: Arc<Store>,
        handler: SamplePageHandler<PushedPageState, Store>,
    }

    #[fixture]
    fn harness() -> Harness {
        let page_state = Arc::new(PushedPageState::new(Duration::from_secs(30)));
        let storage = Arc::new(InMemoryKeyValueStorage::new());
        let store = Arc::new(KeyValueWatchTimeStore::new(storage.clone()));
        let handler = SamplePageHandler::new(
            page_state.clone(),
            store.clone(),
            PageInspector::default(),
            SamplingPolicy::fixed(Duration::from_secs(10)),
        );
        Harness {
            page_state,
            storage,
            store,
            handler,
        }
    }

    struct FailingPageState;

    #[async_trait::async_trait]
    impl PageStateProvider for FailingPageState {
        async fn current_page(&self) -> Result<Option<PageSnapshot>, PageStateError> {
            Err(PageStateError::Unavailable("bridge went away".into()))
        }
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_not_touch_the_store_without_a_page(harness: Harness) {
        let (_, decision) = harness
            .handler
            .handle(SamplerState::default(), Instant::now())
            .await;
        assert_eq!(decision, SampleDecision::NotOnWatchPage);
        assert_eq!(harness.storage.set_calls(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_not_touch_the_store_off_a_watch_page(harness: Harness) {
        harness
            .page_state
            .push(HOME_URL, live_page("Lofi Girl", true))
            .await;
        let (_, decision) = harness
            .handler
            .handle(SamplerState::default(), Instant::now())
            .await;
        assert_eq!(decision, SampleDecision::NotOnWatchPage);
        assert_eq!(harness.storage.set_calls(), 0);
    }

    #[rstest]
    #[case(vod_page("Lofi Girl", true), SampleDecision::NoLiveBroadcast)]
    #[case(live_page("Lofi Girl", false), SampleDecision::Paused)]
    #[tokio::test]
    async fn it_should_not_touch_the_store_unless_live_and_playing(
        harness: Harness,
        #[case] html: String,
        #[case] expected: SampleDecision,
    ) {
        harness.page_state.push(WATCH_URL, html).await;
        let (_, decision) = harness
            .handler
            .handle(SamplerState::default(), Instant::now())
            .await;
        assert_eq!(decision, expected);
        assert_eq!(harness.storage.set_calls(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_merge_exactly_one_interval_per_attributable_tick(harness: Harness) {
        harness
            .page_state
            .push(WATCH_URL, live_page("Lofi Girl", true))
            .await;
        let (state, _) = harness
            .handler
            .handle(SamplerState::default(), Instant::now())
            .await;
        assert_eq!(harness.storage.set_calls(), 1);
        assert_eq!(harness.store.get().await.unwrap().seconds_for("Lofi Girl"), 10);

        harness.handler.handle(state, Instant::now()).await;
        assert_eq!(harness.storage.set_calls(), 2);
        assert_eq!(harness.store.get().await.unwrap().seconds_for("Lofi Girl"), 20);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_follow_in_page_navigation_between_ticks(harness: Harness) {
        harness.page_state.push(WATCH_URL, live_page("A", true)).await;
        let (state, _) = harness
            .handler
            .handle(SamplerState::default(), Instant::now())
            .await;
        harness
            .page_state
            .push(OTHER_WATCH_URL, live_page("B", true))
            .await;
        let (state, _) = harness.handler.handle(state, Instant::now()).await;

        let record = harness.store.get().await.unwrap();
        assert_eq!(record.seconds_for("A"), 10);
        assert_eq!(record.seconds_for("B"), 10);
        assert_eq!(state.last_url.as_deref(), Some(OTHER_WATCH_URL));
        assert_eq!(state.last_channel.as_deref(), Some("B"));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_credit_the_unknown_channel_when_the_label_is_missing(harness: Harness) {
        harness
            .page_state
            .push(WATCH_URL, live_page_without_channel(true))
            .await;
        harness
            .handler
            .handle(SamplerState::default(), Instant::now())
            .await;
        assert_eq!(
            harness.store.get().await.unwrap().seconds_for(UNKNOWN_CHANNEL),
            10
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_drop_the_tick_when_the_store_is_unavailable(harness: Harness) {
        harness
            .page_state
            .push(WATCH_URL, live_page("Lofi Girl", true))
            .await;
        harness.storage.set_offline(true);
        let (state, decision) = harness
            .handler
            .handle(SamplerState::default(), Instant::now())
            .await;
        assert!(matches!(decision, SampleDecision::Attributable { .. }));

        harness.storage.set_offline(false);
        harness.handler.handle(state, Instant::now()).await;
        assert_eq!(harness.store.get().await.unwrap().seconds_for("Lofi Girl"), 10);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_treat_a_failing_provider_as_no_page(harness: Harness) {
        let handler = SamplePageHandler::new(
            Arc::new(FailingPageState),
            harness.store.clone(),
            PageInspector::default(),
            SamplingPolicy::default(),
        );
        let (_, decision) = handler.handle(SamplerState::default(), Instant::now()).await;
        assert_eq!(decision, SampleDecision::NotOnWatchPage);
        assert_eq!(harness.storage.set_calls(), 0);
    }
}
