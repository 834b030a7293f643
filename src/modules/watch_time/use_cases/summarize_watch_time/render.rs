// Terminal rendering of the summary for the `summary` command.

use crate::modules::watch_time::use_cases::summarize_watch_time::summary::{
    ChartSlice, SummaryState,
};
use std::fmt::Write;

const BAR_WIDTH: usize = 30;

pub fn render_text(summary: &SummaryState) -> String {
    match summary {
        SummaryState::Loading => "Loading...\n".to_string(),
        SummaryState::Empty => "No watch time recorded yet.\n".to_string(),
        SummaryState::Populated {
            total_formatted,
            top_channels,
            chart,
            ..
        } => {
            let mut out = String::new();
            let _ = writeln!(out, "Total watch time: {total_formatted}");
            let _ = writeln!(out);
            let _ = writeln!(out, "Top channels");
            for channel in top_channels {
                let _ = writeln!(
                    out,
                    "{:>3}. {} ({})",
                    channel.rank, channel.channel, channel.formatted
                );
            }
            let _ = writeln!(out);
            let _ = writeln!(out, "Share of watch time");
            let name_width = chart
                .iter()
                .map(|slice| slice.channel.chars().count())
                .max()
                .unwrap_or(0);
            for slice in chart {
                let _ = writeln!(
                    out,
                    "{:<name_width$}  {} {:>5.1}%",
                    slice.channel,
                    bar(slice),
                    slice.share * 100.0
                );
            }
            out
        }
    }
}

fn bar(slice: &ChartSlice) -> String {
    let filled = ((slice.share * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}
