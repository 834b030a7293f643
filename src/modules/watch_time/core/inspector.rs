// Page inspector: read-only queries against a page snapshot.
//
// Purpose
// - Answer "is this a watch page?", "is a live broadcast present?", "is it playing?" and
//   "which channel is it?" for the sampler.
//
// Responsibilities
// - Own every host markup selector, so a markup change on the host touches only this file.
// - Degrade any failed lookup to the negative answer, or to UNKNOWN_CHANNEL for the channel.
//   Nothing escapes an inspection pass.

use crate::modules::watch_time::core::page::{PageObservation, PageSnapshot};
use scraper::{Html, Selector};

pub const UNKNOWN_CHANNEL: &str = "Unknown Channel";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelectors {
    /// Substring of the location that identifies a single-video view.
    pub watch_url_marker: String,
    pub live_chat_frame: String,
    pub player: String,
    pub playing_class: String,
    pub channel_name: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            watch_url_marker: "/watch?".to_string(),
            live_chat_frame: "#chat-container ytd-live-chat-frame #chatframe".to_string(),
            player: ".html5-video-player".to_string(),
            playing_class: "playing-mode".to_string(),
            channel_name: "#upload-info ytd-channel-name #text a".to_string(),
        }
    }
}

pub struct PageInspector {
    watch_url_marker: String,
    playing_class: String,
    live_chat_frame: Option<Selector>,
    player: Option<Selector>,
    channel_name: Option<Selector>,
}

impl PageInspector {
    pub fn new(selectors: PageSelectors) -> Self {
        Self {
            live_chat_frame: parse_selector("live chat frame", &selectors.live_chat_frame),
            player: parse_selector("player", &selectors.player),
            channel_name: parse_selector("channel name", &selectors.channel_name),
            watch_url_marker: selectors.watch_url_marker,
            playing_class: selectors.playing_class,
        }
    }

    pub fn is_watch_page(&self, url: &str) -> bool {
        url.contains(&self.watch_url_marker)
    }

    /// Absence of the chat frame means either not live or chat disabled; both count as not live.
    pub fn has_live_broadcast(&self, document: &Html) -> bool {
        self.live_chat_frame
            .as_ref()
            .is_some_and(|selector| document.select(selector).next().is_some())
    }

    /// A missing player counts as not playing.
    pub fn is_playing(&self, document: &Html) -> bool {
        let Some(selector) = self.player.as_ref() else {
            return false;
        };
        document.select(selector).next().is_some_and(|player| {
            player
                .value()
                .classes()
                .any(|class| class == self.playing_class)
        })
    }

    pub fn current_channel_name(&self, document: &Html) -> String {
        self.channel_name
            .as_ref()
            .and_then(|selector| document.select(selector).next())
            .map(|link| link.text().collect::<String>().trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_CHANNEL.to_string())
    }

    /// Runs the queries in sampling order, stopping at the first negative answer.
    pub fn inspect(&self, snapshot: &PageSnapshot) -> PageObservation {
        if !self.is_watch_page(&snapshot.url) {
            return PageObservation::off_watch_page(snapshot.url.clone());
        }

        let document = Html::parse_document(&snapshot.html);
        let mut observation = PageObservation {
            url: snapshot.url.clone(),
            on_watch_page: true,
            live_broadcast: self.has_live_broadcast(&document),
            playing: false,
            channel: None,
        };
        if !observation.live_broadcast {
            return observation;
        }

        observation.playing = self.is_playing(&document);
        if observation.playing {
            observation.channel = Some(self.current_channel_name(&document));
        }
        observation
    }
}

impl Default for PageInspector {
    fn default() -> Self {
        Self::new(PageSelectors::default())
    }
}

fn parse_selector(name: &str, source: &str) -> Option<Selector> {
    match Selector::parse(source) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::warn!(selector = source, "{name} selector unavailable: {e}");
            None
        }
    }
}
