// Summary read model derived from one full record snapshot.
//
// Responsibilities
// - Rank channels by descending watched seconds; ties keep the record's insertion order.
// - Keep the top TOP_CHANNELS for the ranked list.
// - Build the proportion chart over every channel, not just the top ones.
// - Never perform input or output.

use crate::modules::watch_time::core::duration::format_duration;
use crate::modules::watch_time::core::record::WatchTimeRecord;
use serde::Serialize;

pub const TOP_CHANNELS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedChannel {
    pub rank: usize,
    pub channel: String,
    pub seconds: u64,
    pub formatted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    pub channel: String,
    pub seconds: u64,
    /// Share of the total, between 0 and 1.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SummaryState {
    Loading,
    Empty,
    Populated {
        total_seconds: u64,
        total_formatted: String,
        top_channels: Vec<RankedChannel>,
        chart: Vec<ChartSlice>,
    },
}

/// Channels sorted by descending seconds. The sort is stable, so ties keep insertion order.
pub fn rank_channels(record: &WatchTimeRecord) -> Vec<(String, u64)> {
    let mut ranked: Vec<(String, u64)> = record
        .iter()
        .map(|(channel, seconds)| (channel.to_string(), seconds))
        .collect();
    ranked.sort_by(|(_, a), (_, b)| b.cmp(a));
    ranked
}

pub fn top_channels(record: &WatchTimeRecord, limit: usize) -> Vec<RankedChannel> {
    rank_channels(record)
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, (channel, seconds))| RankedChannel {
            rank: index + 1,
            channel,
            seconds,
            formatted: format_duration(seconds),
        })
        .collect()
}

pub fn chart_slices(record: &WatchTimeRecord) -> Vec<ChartSlice> {
    let total = record.total_seconds();
    rank_channels(record)
        .into_iter()
        .map(|(channel, seconds)| ChartSlice {
            channel,
            seconds,
            share: if total == 0 {
                0.0
            } else {
                seconds as f64 / total as f64
            },
        })
        .collect()
}

pub fn summarize(record: &WatchTimeRecord) -> SummaryState {
    if record.is_empty() {
        return SummaryState::Empty;
    }

    let total_seconds = record.total_seconds();
    SummaryState::Populated {
        total_seconds,
        total_formatted: format_duration(total_seconds),
        top_channels: top_channels(record, TOP_CHANNELS),
        chart: chart_slices(record),
    }
}

#[cfg(test)]
mod watch_time_summary_tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn record() -> WatchTimeRecord {
        [("A", 100), ("B", 300), ("C", 200)].into_iter().collect()
    }

    fn many_channels(count: u64) -> WatchTimeRecord {
        (1..=count)
            .map(|i| (format!("Channel {i}"), i * 10))
            .collect()
    }

    #[rstest]
    fn it_should_rank_channels_by_descending_time(record: WatchTimeRecord) {
        let names: Vec<String> = top_channels(&record, TOP_CHANNELS)
            .into_iter()
            .map(|c| c.channel)
            .collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }

    #[rstest]
    fn it_should_number_and_format_ranked_channels(record: WatchTimeRecord) {
        let top = top_channels(&record, TOP_CHANNELS);
        assert_eq!(
            top[0],
            RankedChannel {
                rank: 1,
                channel: "B".to_string(),
                seconds: 300,
                formatted: "5m 0s".to_string(),
            }
        );
        assert_eq!(top[2].rank, 3);
    }

    #[rstest]
    fn it_should_break_ties_by_insertion_order() {
        let record: WatchTimeRecord = [("First", 50), ("Top", 90), ("Second", 50)]
            .into_iter()
            .collect();
        let names: Vec<String> = rank_channels(&record).into_iter().map(|(c, _)| c).collect();
        assert_eq!(names, vec!["Top", "First", "Second"]);
    }

    #[rstest]
    fn it_should_limit_the_ranked_list_but_chart_every_channel() {
        let record = many_channels(14);
        let SummaryState::Populated {
            top_channels, chart, ..
        } = summarize(&record)
        else {
            panic!("expected a populated summary");
        };
        assert_eq!(top_channels.len(), TOP_CHANNELS);
        assert_eq!(chart.len(), 14);
        assert_eq!(top_channels[0].channel, "Channel 14");
        assert_eq!(chart.last().unwrap().channel, "Channel 1");
    }

    #[rstest]
    fn it_should_compute_shares_of_the_total(record: WatchTimeRecord) {
        let chart = chart_slices(&record);
        let shares: Vec<f64> = chart.iter().map(|s| s.share).collect();
        assert_eq!(shares, vec![0.5, 200.0 / 600.0, 100.0 / 600.0]);
        assert!((shares.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[rstest]
    fn it_should_give_zero_shares_when_every_channel_is_zero() {
        let record: WatchTimeRecord = [("A", 0), ("B", 0)].into_iter().collect();
        assert!(chart_slices(&record).iter().all(|s| s.share == 0.0));
    }

    #[rstest]
    fn it_should_summarize_an_empty_record_as_empty() {
        assert_eq!(summarize(&WatchTimeRecord::new()), SummaryState::Empty);
    }

    #[rstest]
    fn it_should_summarize_the_total(record: WatchTimeRecord) {
        match summarize(&record) {
            SummaryState::Populated {
                total_seconds,
                total_formatted,
                ..
            } => {
                assert_eq!(total_seconds, 600);
                assert_eq!(total_formatted, "10m 0s");
            }
            other => panic!("expected a populated summary, got {other:?}"),
        }
    }

    #[rstest]
    fn it_should_serialize_with_a_state_tag() {
        let json = serde_json::to_value(SummaryState::Empty).unwrap();
        assert_eq!(json, serde_json::json!({"state": "empty"}));
    }
}
