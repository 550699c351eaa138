// src/logging.rs

//! Logging setup for `scanrun` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `SCANRUN_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`
//!
//! The same level is handed to the scanner through its logging-level
//! property, so both sides log at the same verbosity.
//!
//! Logs are sent to STDERR so that stdout carries only scanner output.

use anyhow::Result;
use tracing_subscriber::fmt;

use crate::types::LogLevel;

pub const LOG_ENV_VAR: &str = "SCANRUN_LOG";

/// Initialise global logging subscriber and return the effective level.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<LogLevel> {
    let level = effective_level(cli_level, std::env::var(LOG_ENV_VAR).ok().as_deref());

    // Send logs to stderr; keep stdout free for scanner output.
    fmt()
        .with_max_level(tracing_level(level))
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(level)
}

/// Resolve the run's log level from the CLI flag and the env var value.
pub fn effective_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> LogLevel {
    cli_level
        .or_else(|| env_value.and_then(|s| s.parse().ok()))
        .unwrap_or_default()
}

fn tracing_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}
