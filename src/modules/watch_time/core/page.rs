use tokio::time::Instant;

/// The page as the browser bridge last reported it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub url: String,
    pub html: String,
    pub captured_at: Instant,
}

impl PageSnapshot {
    pub fn new(url: impl Into<String>, html: impl Into<String>, captured_at: Instant) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            captured_at,
        }
    }
}

/// What one inspection pass found on a page.
///
/// Queries are evaluated in sampling order and stop at the first negative answer, so
/// `channel` is only resolved for a live broadcast that is playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageObservation {
    pub url: String,
    pub on_watch_page: bool,
    pub live_broadcast: bool,
    pub playing: bool,
    pub channel: Option<String>,
}

impl PageObservation {
    pub fn off_watch_page(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            on_watch_page: false,
            live_broadcast: false,
            playing: false,
            channel: None,
        }
    }
}
