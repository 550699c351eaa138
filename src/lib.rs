// src/lib.rs

pub mod args;
pub mod cli;
pub mod config;
pub mod env;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod platform;
pub mod runner;
pub mod strategy;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_and_validate};
use crate::env::EnvironmentVariableSet;
use crate::exec::{ConsoleJobLog, LocalHost, ProcessExecutor};
use crate::platform::{LocalArtifactCache, LocalPlatform, StaticCredentialStore};
use crate::runner::{PreparedRun, RunSettings, ScanRunner};
use crate::strategy::StrategyPreference;
use crate::types::LogLevel;

pub use crate::exec::ExecutionOutcome;

/// High-level entry point used by `main.rs`. Returns the exit code.
///
/// This wires together:
/// - config loading
/// - credential store, platform and artifact collaborators
/// - the local execution host
/// - Ctrl-C / SIGTERM handling
pub async fn run(args: CliArgs, log_level: LogLevel) -> Result<i32> {
    let config_path = args
        .config
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);
    let cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading config from {:?}", config_path))?;

    let inherited = EnvironmentVariableSet::from_process();

    let workspace = args
        .workspace
        .as_deref()
        .map(PathBuf::from)
        .or_else(|| cfg.run.working_directory.clone());
    let platform = Arc::new(LocalPlatform::new(workspace));
    let credentials = Arc::new(StaticCredentialStore::new(
        cfg.credentials.clone(),
        inherited.clone(),
    ));
    let downloader = Arc::new(LocalArtifactCache::new(cfg.download.download_dir.clone()));

    let executor = ProcessExecutor::new(
        Arc::new(ConsoleJobLog),
        Duration::from_secs(cfg.run.cancel_grace_secs),
    );
    let host = Arc::new(LocalHost::new(executor, downloader));

    let settings = RunSettings::from_config(&cfg, log_level, inherited);
    let runner = ScanRunner::new(platform, credentials, host, settings);

    let properties = args.properties.as_deref().unwrap_or(&cfg.run.properties);
    let kind = args.strategy.unwrap_or(cfg.run.strategy);
    let preference = StrategyPreference::from_run_section(&cfg.run, kind)?;

    let prepared = runner.prepare(properties, &preference)?;

    if args.dry_run {
        print_dry_run(&prepared);
        return Ok(0);
    }

    let cancel = CancellationToken::new();
    spawn_signal_listener(cancel.clone());

    let outcome = runner.launch(&prepared, cancel).await?;
    match &outcome {
        ExecutionOutcome::Completed(code) => info!(exit_code = code, "scan finished"),
        ExecutionOutcome::Cancelled => warn!("scan was cancelled"),
        other => warn!(outcome = %other, "scan did not complete"),
    }
    Ok(outcome.exit_code())
}

/// Cancel `token` on Ctrl-C, and on SIGTERM where available.
fn spawn_signal_listener(token: CancellationToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "failed to install SIGTERM handler");
                    wait_for_ctrl_c().await;
                    token.cancel();
                    return;
                }
            };
            tokio::select! {
                _ = sigterm.recv() => info!("received SIGTERM, cancelling scan"),
                _ = wait_for_ctrl_c() => info!("received Ctrl+C, cancelling scan"),
            }
        }
        #[cfg(not(unix))]
        {
            wait_for_ctrl_c().await;
            info!("received Ctrl+C, cancelling scan");
        }
        token.cancel();
    });
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

/// Dry-run output: strategy, environment (secrets masked) and command.
fn print_dry_run(prepared: &PreparedRun) {
    println!("scanrun dry-run");
    println!("  strategy = {}", prepared.strategy.name());
    println!(
        "  working_directory = {}",
        prepared.working_directory.display()
    );
    println!();

    println!("command:");
    println!(
        "  {}",
        prepared.arguments.redacted_line(&prepared.environment)
    );
    println!();

    println!("environment ({} variables):", prepared.environment.len());
    for (key, value) in prepared.environment.redacted() {
        println!("  {key}={value}");
    }

    debug!("dry-run complete (no execution)");
}
