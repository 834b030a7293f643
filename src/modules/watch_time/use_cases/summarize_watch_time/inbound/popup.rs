// Popup page: the summary view rendered as one self-contained HTML document.
//
// Responsibilities
// - Render the loading, empty and populated states.
// - Draw the proportion chart as a CSS conic gradient with a legend, plus the ranked list.
// - Carry the clear control as a form; its label follows the confirmation guard.
//
// Boundaries
// - Reads one snapshot per request. There is no live update; the page refreshes itself only
//   while waiting on data or while a clear is armed.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
};
use std::fmt::Write;
use tokio::time::Instant;

use crate::modules::watch_time::use_cases::summarize_watch_time::summary::{
    ChartSlice, RankedChannel, SummaryState,
};
use crate::shell::state::AppState;

const LOADING_REFRESH_SECS: u64 = 2;

const PALETTE: [&str; 10] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#42d4f4", "#f032e6", "#bfef45",
    "#fabed4", "#469990",
];

const STYLE: &str = "body{font-family:sans-serif;width:320px;margin:12px}\
h1{font-size:16px}\
.chart{width:160px;height:160px;border-radius:50%;margin:8px auto}\
.legend{list-style:none;padding:0;font-size:12px}\
.swatch{display:inline-block;width:10px;height:10px;margin-right:6px}\
ol{padding-left:20px;font-size:13px}\
.total{font-weight:bold}\
button{width:100%;margin-top:8px}";

pub async fn handle_page(State(state): State<AppState>) -> impl IntoResponse {
    let now = Instant::now();
    let summary = match state.summarize_handler.handle().await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!("popup shows loading: {e}");
            SummaryState::Loading
        }
    };
    let clear = ClearControl {
        label: state.clear_handler.label(now).await,
        refresh_secs: state
            .clear_handler
            .time_left(now)
            .await
            .map(|left| left.as_secs_f64().ceil() as u64),
    };
    Html(render_popup(&summary, &clear))
}

pub async fn handle_clear(State(state): State<AppState>) -> impl IntoResponse {
    match state.clear_handler.press(Instant::now()).await {
        Ok(outcome) => {
            tracing::debug!(?outcome, "clear pressed from popup");
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::error!("clear failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub struct ClearControl {
    pub label: &'static str,
    /// Seconds until an armed confirmation lapses; None when the guard is idle.
    pub refresh_secs: Option<u64>,
}

pub fn render_popup(summary: &SummaryState, clear: &ClearControl) -> String {
    let refresh = match summary {
        SummaryState::Loading => Some(LOADING_REFRESH_SECS),
        _ => clear.refresh_secs,
    };

    let mut html = String::from("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    if let Some(secs) = refresh {
        let _ = write!(html, "<meta http-equiv=\"refresh\" content=\"{secs}\">");
    }
    let _ = write!(
        html,
        "<title>Live watch time</title><style>{STYLE}</style></head><body><h1>Live watch time</h1>"
    );

    match summary {
        SummaryState::Loading => html.push_str("<p class=\"loading\">Loading...</p>"),
        SummaryState::Empty => {
            html.push_str("<p class=\"empty\">No watch time recorded yet.</p>")
        }
        SummaryState::Populated {
            total_formatted,
            top_channels,
            chart,
            ..
        } => {
            let _ = write!(
                html,
                "<p class=\"total\">Total: {}</p>",
                escape_html(total_formatted)
            );
            render_chart(&mut html, chart);
            render_ranking(&mut html, top_channels);
        }
    }

    let _ = write!(
        html,
        "<form method=\"post\" action=\"/popup/clear\"><button type=\"submit\">{}</button></form></body></html>",
        escape_html(clear.label)
    );
    html
}

fn render_chart(html: &mut String, chart: &[ChartSlice]) {
    let mut stops = Vec::with_capacity(chart.len());
    let mut start = 0.0;
    for (index, slice) in chart.iter().enumerate() {
        let end = start + slice.share * 100.0;
        stops.push(format!(
            "{} {start:.2}% {end:.2}%",
            PALETTE[index % PALETTE.len()]
        ));
        start = end;
    }
    let _ = write!(
        html,
        "<div class=\"chart\" style=\"background:conic-gradient({})\"></div><ul class=\"legend\">",
        stops.join(",")
    );
    for (index, slice) in chart.iter().enumerate() {
        let _ = write!(
            html,
            "<li><span class=\"swatch\" style=\"background:{}\"></span>{} ({:.1}%)</li>",
            PALETTE[index % PALETTE.len()],
            escape_html(&slice.channel),
            slice.share * 100.0
        );
    }
    html.push_str("</ul>");
}

fn render_ranking(html: &mut String, top_channels: &[RankedChannel]) {
    html.push_str("<ol class=\"ranking\">");
    for channel in top_channels {
        let _ = write!(
            html,
            "<li>{}: {}</li>",
            escape_html(&channel.channel),
            channel.formatted
        );
    }
    html.push_str("</ol>");
}

/// Channel names are scraped page text and must not be interpreted as markup.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
