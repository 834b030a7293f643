use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use live_watch_time::shell::cli::{Args, Command};
use live_watch_time::shell::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            return Err(e.into());
        }
    };
    if let Some(data_file) = args.data_file {
        config.data_file = data_file;
    }

    match args.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            live_watch_time::shell::serve(config).await
        }
        Command::Summary { json } => live_watch_time::shell::summary(config, json).await,
        Command::Clear => live_watch_time::shell::clear(config).await,
    }
}
