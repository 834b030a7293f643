// Two-step confirmation guarding the clear-all command.
//
// - The first press arms a confirmation window.
// - A second press inside the window confirms.
// - Once the window elapses the guard is disarmed; the next press arms again.

use tokio::time::{Duration, Instant};

pub const CONFIRM_WINDOW: Duration = Duration::from_secs(3);

pub const CLEAR_LABEL: &str = "Clear data";
pub const CONFIRM_LABEL: &str = "Click again to confirm";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearPress {
    Armed { expires_at: Instant },
    Confirmed,
}

#[derive(Debug, Clone)]
pub struct ClearConfirmation {
    window: Duration,
    armed_at: Option<Instant>,
}

impl ClearConfirmation {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            armed_at: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn is_armed(&self, now: Instant) -> bool {
        self.armed_at
            .is_some_and(|armed_at| now.saturating_duration_since(armed_at) < self.window)
    }

    /// Time until an armed confirmation lapses.
    pub fn time_left(&self, now: Instant) -> Option<Duration> {
        let armed_at = self.armed_at?;
        let left = self.window.saturating_sub(now.saturating_duration_since(armed_at));
        (!left.is_zero()).then_some(left)
    }

    pub fn press(&mut self, now: Instant) -> ClearPress {
        if self.is_armed(now) {
            self.armed_at = None;
            return ClearPress::Confirmed;
        }
        self.armed_at = Some(now);
        ClearPress::Armed {
            expires_at: now + self.window,
        }
    }

    pub fn label(&self, now: Instant) -> &'static str {
        if self.is_armed(now) {
            CONFIRM_LABEL
        } else {
            CLEAR_LABEL
        }
    }
}

impl Default for ClearConfirmation {
    fn default() -> Self {
        Self::new(CONFIRM_WINDOW)
    }
}
