// Runtime configuration read from the environment.
//
// dotenvy loads an optional .env before this runs; CLI flags override the data file and
// bind address afterwards.

use crate::modules::watch_time::use_cases::sample_page::decision::{CreditMode, SamplingPolicy};
use crate::shared::infrastructure::key_value_storage::DEFAULT_QUOTA_BYTES_PER_ITEM;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;
use tokio::time::Duration;

pub const DATA_FILE_VAR: &str = "WATCH_TIME_DATA_FILE";
pub const INTERVAL_SECS_VAR: &str = "WATCH_TIME_INTERVAL_SECS";
pub const INITIAL_DELAY_MS_VAR: &str = "WATCH_TIME_INITIAL_DELAY_MS";
pub const BIND_ADDR_VAR: &str = "WATCH_TIME_BIND_ADDR";
pub const QUOTA_BYTES_VAR: &str = "WATCH_TIME_QUOTA_BYTES";
pub const CREDIT_MODE_VAR: &str = "WATCH_TIME_CREDIT_MODE";
pub const SNAPSHOT_MAX_AGE_SECS_VAR: &str = "WATCH_TIME_SNAPSHOT_MAX_AGE_SECS";

const DEFAULT_INTERVAL_SECS: u64 = 10;
const DEFAULT_INITIAL_DELAY_MS: u64 = 1_000;
const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8917);
const DEFAULT_SNAPSHOT_MAX_AGE_SECS: u64 = 30;
const DATA_FILE_NAME: &str = "watch_time.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not valid: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("no data directory on this platform; set {DATA_FILE_VAR}")]
    NoDataDir,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub bind_addr: SocketAddr,
    pub sampling: SamplingPolicy,
    pub initial_delay: Duration,
    /// None disables the per-item quota check.
    pub quota_bytes_per_item: Option<usize>,
    pub snapshot_max_age: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_file = match lookup(DATA_FILE_VAR) {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_data_file()?,
        };

        let interval_secs = parse_or(&lookup, INTERVAL_SECS_VAR, DEFAULT_INTERVAL_SECS)?;
        if interval_secs == 0 {
            return Err(ConfigError::Invalid {
                var: INTERVAL_SECS_VAR,
                value: "0".to_string(),
                reason: "must be at least one second".to_string(),
            });
        }

        let credit_mode = match lookup(CREDIT_MODE_VAR).as_deref().map(str::trim) {
            None | Some("") | Some("fixed") => CreditMode::FixedInterval,
            Some("wall-clock") => CreditMode::WallClock,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: CREDIT_MODE_VAR,
                    value: other.to_string(),
                    reason: "expected `fixed` or `wall-clock`".to_string(),
                });
            }
        };

        let quota = parse_or(&lookup, QUOTA_BYTES_VAR, DEFAULT_QUOTA_BYTES_PER_ITEM)?;

        Ok(Self {
            data_file,
            bind_addr: parse_or(&lookup, BIND_ADDR_VAR, DEFAULT_BIND_ADDR)?,
            sampling: SamplingPolicy {
                interval: Duration::from_secs(interval_secs),
                credit_mode,
            },
            initial_delay: Duration::from_millis(parse_or(
                &lookup,
                INITIAL_DELAY_MS_VAR,
                DEFAULT_INITIAL_DELAY_MS,
            )?),
            quota_bytes_per_item: (quota > 0).then_some(quota),
            snapshot_max_age: Duration::from_secs(parse_or(
                &lookup,
                SNAPSHOT_MAX_AGE_SECS_VAR,
                DEFAULT_SNAPSHOT_MAX_AGE_SECS,
            )?),
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn default_data_file() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join("live_watch_time").join(DATA_FILE_NAME))
        .ok_or(ConfigError::NoDataDir)
}
