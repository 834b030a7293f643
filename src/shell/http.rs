use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    http::{
        HeaderValue, Method, StatusCode,
        header::{CONTENT_TYPE, HOST, ORIGIN},
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::modules::watch_time::use_cases::clear_watch_time::inbound::http as clear_http;
use crate::modules::watch_time::use_cases::sample_page::inbound::http as page_state_http;
use crate::modules::watch_time::use_cases::summarize_watch_time::inbound::http as summary_http;
use crate::modules::watch_time::use_cases::summarize_watch_time::inbound::popup;
use crate::shell::state::AppState;

/// The only origin allowed to push page state from a browser.
pub const BRIDGE_ORIGIN: &str = "https://www.youtube.com";

pub fn router(state: AppState) -> Router {
    let bridge = Router::new()
        .route(
            "/page-state",
            put(page_state_http::handle_push).delete(page_state_http::handle_detach),
        )
        .layer(DefaultBodyLimit::max(page_state_http::PAGE_STATE_BODY_LIMIT))
        .layer(
            CorsLayer::new()
                .allow_origin(HeaderValue::from_static(BRIDGE_ORIGIN))
                .allow_methods([Method::PUT, Method::DELETE])
                .allow_headers([CONTENT_TYPE]),
        );

    let clear = Router::new()
        .route("/clear", post(clear_http::handle))
        .route("/popup/clear", post(popup::handle_clear))
        .route_layer(middleware::from_fn(require_same_origin));

    Router::new()
        .route("/summary", get(summary_http::handle))
        .route("/", get(popup::handle_page))
        .merge(bridge)
        .merge(clear)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Requests carrying an `Origin` must come from a page served by this daemon.
async fn require_same_origin(request: Request, next: Next) -> Response {
    let headers = request.headers();
    if let Some(origin) = headers.get(ORIGIN) {
        let host = headers.get(HOST).and_then(|h| h.to_str().ok());
        let same_origin = match (origin.to_str().ok(), host) {
            (Some(origin), Some(host)) => origin == format!("http://{host}"),
            _ => false,
        };
        if !same_origin {
            tracing::warn!(
                origin = ?origin,
                path = %request.uri().path(),
                "cross-origin request rejected"
            );
            return StatusCode::FORBIDDEN.into_response();
        }
    }
    next.run(request).await
}
