use tokio::time::{Duration, Instant};

/// Outcome of one inspection cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleDecision {
    NotOnWatchPage,
    NoLiveBroadcast,
    Paused,
    Attributable {
        channel: String,
        elapsed_seconds: u64,
    },
}

/// How much time an attributable tick credits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreditMode {
    /// The nominal tick length, assuming the observed state held for the whole interval.
    #[default]
    FixedInterval,
    /// Wall-clock time since the previous sample, at most twice the interval.
    WallClock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingPolicy {
    pub interval: Duration,
    pub credit_mode: CreditMode,
}

impl SamplingPolicy {
    pub fn fixed(interval: Duration) -> Self {
        Self {
            interval,
            credit_mode: CreditMode::FixedInterval,
        }
    }

    pub fn interval_seconds(&self) -> u64 {
        self.interval.as_secs()
    }

    pub fn credit_seconds(&self, last_sampled_at: Option<Instant>, now: Instant) -> u64 {
        match (self.credit_mode, last_sampled_at) {
            (CreditMode::WallClock, Some(previous)) => {
                let elapsed = now.saturating_duration_since(previous);
                elapsed.min(self.interval * 2).as_secs_f64().round() as u64
            }
            _ => self.interval_seconds(),
        }
    }
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self::fixed(Duration::from_secs(10))
    }
}

/// Sampler state threaded explicitly from one tick to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamplerState {
    pub last_url: Option<String>,
    /// Channel credited by the most recent tick, if that tick was attributable.
    pub last_channel: Option<String>,
    pub last_sampled_at: Option<Instant>,
}
