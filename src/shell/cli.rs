use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "live_watch_time",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track live-stream watch time per channel"
)]
pub struct Args {
    /// Storage file; overrides WATCH_TIME_DATA_FILE.
    #[arg(short, long, value_name = "FILE", global = true)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(about = "Run the sampler and serve the bridge endpoint and popup")]
    Serve {
        /// Overrides WATCH_TIME_BIND_ADDR.
        #[arg(short, long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
    },

    #[command(about = "Print the watch time summary")]
    Summary {
        #[arg(long, action)]
        json: bool,
    },

    #[command(about = "Clear all recorded watch time, after confirmation")]
    Clear,
}
