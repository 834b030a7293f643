use axum::{
    Json, extract::State, extract::rejection::JsonRejection, http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::shell::state::AppState;

/// Pushes carry a full watch-page document, which routinely exceeds axum's 2 MiB default.
pub const PAGE_STATE_BODY_LIMIT: usize = 16 * 1024 * 1024;

#[derive(Deserialize)]
pub struct PageStateBody {
    pub url: String,
    pub html: String,
}

pub async fn handle_push(
    State(state): State<AppState>,
    body: Result<Json<PageStateBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!("page push rejected, body over the size limit: {rejection}");
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };

    state.page_state.push(body.url, body.html).await;
    StatusCode::NO_CONTENT.into_response()
}

pub async fn handle_detach(State(state): State<AppState>) -> impl IntoResponse {
    state.page_state.detach().await;
    StatusCode::NO_CONTENT
}
