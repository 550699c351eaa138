// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::Parser;

use crate::types::{LogLevel, StrategyKind};

/// Command-line arguments for `scanrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "scanrun",
    version,
    about = "Launch the scanner inside a CI job with injected credentials.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `SCANRUN_CONFIG`, else `ScanRun.toml` in the current
    /// working directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Scanner properties, replacing `[run].properties` from the config.
    #[arg(long, value_name = "PROPERTIES", allow_hyphen_values = true)]
    pub properties: Option<String>,

    /// How to obtain and start the scanner, replacing `[run].strategy`.
    #[arg(long, value_enum, value_name = "STRATEGY")]
    pub strategy: Option<StrategyKind>,

    /// Directory the scanner runs in. Defaults to `WORKSPACE` or the
    /// current directory.
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SCANRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve the strategy and print the environment and command line,
    /// but don't start the scanner.
    #[arg(long)]
    pub dry_run: bool,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
