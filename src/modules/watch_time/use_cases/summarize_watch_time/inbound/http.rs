use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::modules::watch_time::use_cases::summarize_watch_time::summary::SummaryState;
use crate::shell::state::AppState;

#[derive(Serialize)]
pub struct SummaryResponse {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub summary: SummaryState,
}

pub async fn handle(State(state): State<AppState>) -> impl IntoResponse {
    match state.summarize_handler.handle().await {
        Ok(summary) => Json(SummaryResponse {
            generated_at: Utc::now(),
            summary,
        })
        .into_response(),
        Err(e) => {
            tracing::error!("summary read failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
