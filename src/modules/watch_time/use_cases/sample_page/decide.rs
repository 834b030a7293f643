// Pure decision function for one sampler tick.
//
// Purpose
// - Map what the inspector observed to a SampleDecision and the next SamplerState.
//
// Responsibilities
// - No page, or not a watch page: NotOnWatchPage.
// - No live broadcast: NoLiveBroadcast. Not playing: Paused.
// - Otherwise Attributable, crediting the channel seen at sampling time for the whole
//   tick. A channel change inside the tick window is not apportioned.
// - Never perform input or output.

use crate::modules::watch_time::core::inspector::UNKNOWN_CHANNEL;
use crate::modules::watch_time::core::page::PageObservation;
use crate::modules::watch_time::use_cases::sample_page::decision::{
    SampleDecision, SamplerState, SamplingPolicy,
};
use tokio::time::Instant;

pub fn decide_sample(
    state: &SamplerState,
    observation: Option<&PageObservation>,
    policy: &SamplingPolicy,
    now: Instant,
) -> SampleDecision {
    let Some(observation) = observation.filter(|o| o.on_watch_page) else {
        return SampleDecision::NotOnWatchPage;
    };
    if !observation.live_broadcast {
        return SampleDecision::NoLiveBroadcast;
    }
    if !observation.playing {
        return SampleDecision::Paused;
    }

    SampleDecision::Attributable {
        channel: observation
            .channel
            .clone()
            .unwrap_or_else(|| UNKNOWN_CHANNEL.to_string()),
        elapsed_seconds: policy.credit_seconds(state.last_sampled_at, now),
    }
}

pub fn evolve_sampler(
    observation: Option<&PageObservation>,
    decision: &SampleDecision,
    now: Instant,
) -> SamplerState {
    SamplerState {
        last_url: observation.map(|o| o.url.clone()),
        last_channel: match decision {
            SampleDecision::Attributable { channel, .. } => Some(channel.clone()),
            _ => None,
        },
        last_sampled_at: Some(now),
    }
}

/// One tick: decide, then fold the decision into the next state.
pub fn sample(
    state: SamplerState,
    observation: Option<&PageObservation>,
    policy: &SamplingPolicy,
    now: Instant,
) -> (SamplerState, SampleDecision) {
    let decision = decide_sample(&state, observation, policy, now);
    let next = evolve_sampler(observation, &decision, now);
    (next, decision)
}
