// src/runner.rs

//! Orchestration of a single scanner run.
//!
//! Environment composition → strategy resolution → setup on the execution
//! host → argument assembly → launch. Every step before the launch fails
//! with a [`ScanError`] and leaves nothing running.

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::args::{ArgumentList, MandatoryExtras, assemble};
use crate::config::model::{ConfigFile, ProxySection, ServerSection};
use crate::env::{
    BACKEND, EnvironmentVariableSet, SECONDARY, ServerConfig, base_environment, compose,
    resolve_server_config,
};
use crate::errors::Result;
use crate::exec::{ExecutionHost, ExecutionOutcome};
use crate::platform::{CiPlatform, CredentialStore, UNKNOWN_VERSION};
use crate::strategy::{DownloadConfig, ExecutionStrategy, StrategyPreference, resolve};
use crate::types::LogLevel;

pub const BANNER: &str =
    "******************************************************************************";

/// Per-run settings that come from configuration rather than collaborators.
#[derive(Debug, Clone, Default)]
pub struct RunSettings {
    pub backend: Option<ServerSection>,
    pub secondary: Option<ServerSection>,
    pub proxy: Option<ProxySection>,
    pub download: DownloadConfig,
    pub log_level: LogLevel,
    /// Environment inherited from the process that launches the scanner.
    pub inherited: EnvironmentVariableSet,
}

impl RunSettings {
    pub fn from_config(
        cfg: &ConfigFile,
        log_level: LogLevel,
        inherited: EnvironmentVariableSet,
    ) -> Self {
        Self {
            backend: cfg.server.backend.clone(),
            secondary: cfg.server.secondary.clone(),
            proxy: cfg.proxy.clone(),
            download: DownloadConfig::from(&cfg.download),
            log_level,
            inherited,
        }
    }
}

/// Everything needed to launch the scanner, computed up front.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub strategy: ExecutionStrategy,
    pub environment: EnvironmentVariableSet,
    pub arguments: ArgumentList,
    pub working_directory: PathBuf,
}

pub struct ScanRunner {
    platform: Arc<dyn CiPlatform>,
    credentials: Arc<dyn CredentialStore>,
    host: Arc<dyn ExecutionHost>,
    settings: RunSettings,
}

impl ScanRunner {
    pub fn new(
        platform: Arc<dyn CiPlatform>,
        credentials: Arc<dyn CredentialStore>,
        host: Arc<dyn ExecutionHost>,
        settings: RunSettings,
    ) -> Self {
        Self {
            platform,
            credentials,
            host,
            settings,
        }
    }

    /// Compose the environment for the run.
    ///
    /// Both servers are resolved before anything is written, so a failing
    /// secondary service leaves no partial set behind.
    pub fn environment(&self) -> Result<EnvironmentVariableSet> {
        let base = base_environment(self.settings.inherited.clone(), self.platform.environment());

        let backend = self.server(self.settings.backend.as_ref())?;
        let secondary = self.server(self.settings.secondary.as_ref())?;

        let mut servers = Vec::with_capacity(2);
        if let Some(cfg) = backend.as_ref() {
            servers.push((BACKEND, cfg));
        }
        if let Some(cfg) = secondary.as_ref() {
            servers.push((SECONDARY, cfg));
        }
        Ok(compose(base, &servers))
    }

    fn server(&self, section: Option<&ServerSection>) -> Result<Option<ServerConfig>> {
        section
            .map(|s| {
                resolve_server_config(s, self.settings.proxy.as_ref(), self.credentials.as_ref())
            })
            .transpose()
    }

    /// Resolve, set up and assemble without starting the scanner.
    pub fn prepare(&self, properties: &str, preference: &StrategyPreference) -> Result<PreparedRun> {
        match self.platform.plugin_version() {
            Some(version) => info!(version = %version, "running scanner integration"),
            None => info!("running scanner integration"),
        }

        let mut environment = self.environment()?;

        let os = self.platform.remote_operating_system();
        let strategy = resolve(&environment, os, preference, &self.settings.download)?;

        let invocation = self.host.prepare(&strategy, &environment)?;
        environment.extend_layer(invocation.environment);

        let extras = MandatoryExtras {
            log_level: self.settings.log_level,
            platform_version: self
                .platform
                .platform_version()
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
            plugin_version: self
                .platform
                .plugin_version()
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
        };
        let arguments = assemble(
            &invocation.prefix,
            strategy.escaper(),
            properties,
            &environment,
            &extras,
        )?;

        let working_directory = self.platform.working_directory()?;

        Ok(PreparedRun {
            strategy,
            environment,
            arguments,
            working_directory,
        })
    }

    /// Prepare and launch the scanner, returning its outcome.
    pub async fn run(
        &self,
        properties: &str,
        preference: &StrategyPreference,
        cancel: CancellationToken,
    ) -> Result<ExecutionOutcome> {
        let prepared = self.prepare(properties, preference)?;
        self.launch(&prepared, cancel).await
    }

    /// Launch an already prepared run.
    pub async fn launch(
        &self,
        prepared: &PreparedRun,
        cancel: CancellationToken,
    ) -> Result<ExecutionOutcome> {
        info!(
            command = %prepared.arguments.redacted_line(&prepared.environment),
            "running scanner command"
        );

        info!("{BANNER}");
        info!("START OF SCAN");
        info!("{BANNER}");

        let outcome = self
            .host
            .launch(
                &prepared.arguments,
                &prepared.environment,
                &prepared.working_directory,
                cancel,
            )
            .await;

        info!("{BANNER}");
        info!("END OF SCAN");
        info!("{BANNER}");

        info!(outcome = %outcome, "scanner run finished");
        Ok(outcome)
    }
}
