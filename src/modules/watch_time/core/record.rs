// WatchTimeRecord is the persisted mapping of channel name to cumulative watched seconds.
//
// Persisted layout
// - Namespaced under WATCH_TIME_KEY.
// - Written as a versioned envelope: {"version": 1, "channels": {"<name>": <seconds>}}.
// - Read back from the envelope or from the legacy unversioned map {"<name>": <seconds>}.
//
// Invariants
// - Every value is a non-negative whole number of seconds; an absent key means zero.
// - Insertion order is kept; it breaks ranking ties.
//
// Boundaries
// - Pure data. No input or output.

use serde_json::{Map, Value, json};
use thiserror::Error;

pub const WATCH_TIME_KEY: &str = "watchTimeData";
pub const RECORD_VERSION: u64 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("malformed watch time record: {0}")]
    Malformed(String),

    #[error("unsupported watch time record version: {0}")]
    UnsupportedVersion(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchTimeRecord {
    channels: Vec<(String, u64)>,
}

/// A record read back from storage, with the entries that had to be dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    pub record: WatchTimeRecord,
    pub skipped_entries: Vec<String>,
}

impl WatchTimeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn seconds_for(&self, channel: &str) -> u64 {
        self.channels
            .iter()
            .find(|(name, _)| name == channel)
            .map(|(_, seconds)| *seconds)
            .unwrap_or(0)
    }

    /// Adds `seconds` to the channel's total and returns the new total.
    pub fn add(&mut self, channel: &str, seconds: u64) -> u64 {
        match self.channels.iter_mut().find(|(name, _)| name == channel) {
            Some((_, total)) => {
                *total = total.saturating_add(seconds);
                *total
            }
            None => {
                self.channels.push((channel.to_string(), seconds));
                seconds
            }
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.channels
            .iter()
            .fold(0u64, |acc, (_, seconds)| acc.saturating_add(*seconds))
    }

    /// Channels in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.channels
            .iter()
            .map(|(name, seconds)| (name.as_str(), *seconds))
    }

    pub fn to_stored(&self) -> Value {
        let channels: Map<String, Value> = self
            .channels
            .iter()
            .map(|(name, seconds)| (name.clone(), Value::from(*seconds)))
            .collect();
        json!({
            "version": RECORD_VERSION,
            "channels": channels,
        })
    }

    pub fn decode(stored: &Value) -> Result<DecodedRecord, RecordError> {
        let Value::Object(top) = stored else {
            return Err(RecordError::Malformed(format!(
                "expected an object, found {}",
                kind_of(stored)
            )));
        };

        let entries = match top.get("channels") {
            Some(Value::Object(channels)) => {
                match top.get("version").and_then(Value::as_u64) {
                    Some(RECORD_VERSION) => channels,
                    _ => {
                        let version = top
                            .get("version")
                            .map(Value::to_string)
                            .unwrap_or_else(|| "missing".to_string());
                        return Err(RecordError::UnsupportedVersion(version));
                    }
                }
            }
            // Legacy layout: the object itself is the channel map.
            _ => top,
        };

        let mut record = WatchTimeRecord::new();
        let mut skipped_entries = Vec::new();
        for (channel, value) in entries {
            match seconds_from(value) {
                Some(seconds) => {
                    record.add(channel, seconds);
                }
                None => skipped_entries.push(channel.clone()),
            }
        }

        Ok(DecodedRecord {
            record,
            skipped_entries,
        })
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for WatchTimeRecord {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut record = WatchTimeRecord::new();
        for (channel, seconds) in iter {
            let channel: String = channel.into();
            record.add(&channel, seconds);
        }
        record
    }
}

fn seconds_from(value: &Value) -> Option<u64> {
    if let Some(seconds) = value.as_u64() {
        return Some(seconds);
    }
    match value.as_f64() {
        Some(seconds) if seconds.is_finite() && seconds >= 0.0 => Some(seconds.floor() as u64),
        _ => None,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
