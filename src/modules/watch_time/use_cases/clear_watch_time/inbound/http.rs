use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tokio::time::Instant;

use crate::modules::watch_time::use_cases::clear_watch_time::handler::ClearOutcome;
use crate::shell::state::AppState;

pub async fn handle(State(state): State<AppState>) -> impl IntoResponse {
    match state.clear_handler.press(Instant::now()).await {
        Ok(ClearOutcome::Armed { window }) => (
            StatusCode::ACCEPTED,
            Json(json!({
                "status": "armed",
                "expires_in_ms": window.as_millis() as u64,
            })),
        )
            .into_response(),
        Ok(ClearOutcome::Cleared) => {
            (StatusCode::OK, Json(json!({"status": "cleared"}))).into_response()
        }
        Err(e) => {
            tracing::error!("clear failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
