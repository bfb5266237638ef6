use serde::Deserialize;
use std::env;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::api::DEFAULT_API_BASE;
use crate::error::{CheckError, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api_base: String,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Log filter from `RUST_LOG`, falling back to `info` only when it sets nothing.
pub fn env_log_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
}

pub fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives)
}

pub fn load() -> Result<Config> {
    let api_base = env::var("LOTTO_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

    let http_timeout_secs = env::var("LOTTO_HTTP_TIMEOUT_SECS")
        .unwrap_or_else(|_| "30".to_string())
        .parse::<u64>()
        .map_err(|_| {
            CheckError::Config("LOTTO_HTTP_TIMEOUT_SECS must be a whole number of seconds".to_string())
        })?;

    Ok(Config {
        api_base,
        http_timeout_secs,
    })
}
