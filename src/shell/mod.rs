// Composition root for the watch_time bounded context.
//
// Responsibilities
// - Instantiate concrete infrastructure from AppConfig.
// - Wire it into the use case handlers.
// - Run one command: the daemon (sampler + HTTP surface), a summary print, or a clear.

pub mod cli;
pub mod config;
pub mod http;
pub mod state;

use anyhow::Context;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::modules::watch_time::adapters::outbound::key_value_watch_time_store::KeyValueWatchTimeStore;
use crate::modules::watch_time::adapters::outbound::pushed_page_state::PushedPageState;
use crate::modules::watch_time::core::clear_confirmation::ClearConfirmation;
use crate::modules::watch_time::core::inspector::PageInspector;
use crate::modules::watch_time::core::ports::WatchTimeStore;
use crate::modules::watch_time::use_cases::clear_watch_time::handler::{
    ClearOutcome, ClearWatchTimeHandler,
};
use crate::modules::watch_time::use_cases::sample_page::handler::SamplePageHandler;
use crate::modules::watch_time::use_cases::sample_page::runner::run_sampler;
use crate::modules::watch_time::use_cases::summarize_watch_time::handler::SummarizeWatchTimeHandler;
use crate::modules::watch_time::use_cases::summarize_watch_time::inbound::http::SummaryResponse;
use crate::modules::watch_time::use_cases::summarize_watch_time::render::render_text;
use crate::modules::watch_time::use_cases::summarize_watch_time::summary::SummaryState;
use crate::shared::infrastructure::key_value_storage::json_file::JsonFileStorage;
use crate::shell::config::AppConfig;
use crate::shell::state::AppState;

pub fn open_store(config: &AppConfig) -> Arc<dyn WatchTimeStore> {
    let storage = Arc::new(JsonFileStorage::new(
        config.data_file.clone(),
        config.quota_bytes_per_item,
    ));
    Arc::new(KeyValueWatchTimeStore::new(storage))
}

pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let store = open_store(&config);
    let page_state = Arc::new(PushedPageState::new(config.snapshot_max_age));

    let sampler = Arc::new(SamplePageHandler::new(
        page_state.clone(),
        store.clone(),
        PageInspector::default(),
        config.sampling,
    ));
    let cancel = CancellationToken::new();
    let sampler_task = tokio::spawn(run_sampler(
        sampler,
        config.initial_delay,
        cancel.clone(),
    ));

    let app = http::router(AppState::new(page_state, store));
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!(
        data_file = %config.data_file.display(),
        "serving popup on http://{}/",
        config.bind_addr
    );

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await
        .context("http server failed");

    cancel.cancel();
    sampler_task.await.context("sampler task panicked")?;
    served
}

async fn shutdown_signal(cancel: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("listening for ctrl-c failed: {e}");
            }
            tracing::info!("shutdown requested");
        }
        _ = cancel.cancelled() => {}
    }
    cancel.cancel();
}

pub async fn summary(config: AppConfig, json: bool) -> anyhow::Result<()> {
    let handler = SummarizeWatchTimeHandler::new(open_store(&config));

    if json {
        let summary = handler.handle().await.context("reading watch time")?;
        let response = SummaryResponse {
            generated_at: chrono::Utc::now(),
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    print!("{}", render_text(&SummaryState::Loading));
    let summary = handler.handle().await.context("reading watch time")?;
    print!("{}", render_text(&summary));
    Ok(())
}

pub async fn clear(config: AppConfig) -> anyhow::Result<()> {
    let handler = ClearWatchTimeHandler::new(open_store(&config), ClearConfirmation::default());

    let ClearOutcome::Armed { window } = handler.press(Instant::now()).await? else {
        anyhow::bail!("clear confirmed without being armed");
    };
    println!(
        "Press Enter within {}s to clear all recorded watch time.",
        window.as_secs()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    match tokio::time::timeout(window, lines.next_line()).await {
        Ok(Ok(Some(_))) => match handler.press(Instant::now()).await? {
            ClearOutcome::Cleared => println!("Watch time cleared."),
            ClearOutcome::Armed { .. } => println!("Confirmation expired; nothing cleared."),
        },
        Ok(Ok(None)) | Err(_) => println!("Not confirmed; nothing cleared."),
        Ok(Err(e)) => return Err(e).context("reading confirmation"),
    }
    Ok(())
}
