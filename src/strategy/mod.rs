// src/strategy/mod.rs

//! Execution strategies: how the scanner is obtained and started.
//!
//! - [`resolver`] picks an [`ExecutionStrategy`] from the caller's
//!   [`StrategyPreference`] and the execution host's OS.
//! - [`setup`] prepares the artifact on the execution host and yields the
//!   invocation prefix.
//! - [`escape`] holds the per-strategy argument escapers.

pub mod escape;
pub mod resolver;
pub mod setup;

use std::path::PathBuf;

use crate::config::model::{DownloadSection, RunSection};
use crate::errors::{Result, ScanError};
use crate::types::{OsKind, ScriptInterpreter, StrategyKind};

pub use escape::Escaper;
pub use resolver::resolve;
pub use setup::PreparedInvocation;

/// Variable pointing at a scanner jar; selects the jar strategy in `auto`.
pub const JAR_PATH_VAR: &str = "DETECT_JAR";

/// Variable telling scanner scripts where to cache the jar they fetch.
pub const JAR_DOWNLOAD_DIR_VAR: &str = "DETECT_JAR_DOWNLOAD_DIR";

/// Function a PowerShell scanner module exposes.
pub const POWERSHELL_ENTRY_POINT: &str = "detect";

/// Where a strategy's artifact comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    /// Already present on the execution host.
    Installed(PathBuf),
    /// Fetched through the artifact manager during setup.
    Download(String),
}

/// The closed set of ways to start the scanner. Resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStrategy {
    Jar {
        jar: ArtifactSource,
        java_home: Option<PathBuf>,
        target_os: OsKind,
    },
    PowerShellScript {
        script: ArtifactSource,
    },
    ShellScript {
        script: ArtifactSource,
    },
}

impl ExecutionStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            ExecutionStrategy::Jar { .. } => "jar",
            ExecutionStrategy::PowerShellScript { .. } => "powershell-script",
            ExecutionStrategy::ShellScript { .. } => "shell-script",
        }
    }

    pub fn escaper(&self) -> Escaper {
        match self {
            ExecutionStrategy::Jar { .. } => escape::identity,
            ExecutionStrategy::PowerShellScript { .. } => escape::escape_powershell,
            ExecutionStrategy::ShellScript { .. } => escape::escape_xsi,
        }
    }

    pub fn artifact(&self) -> &ArtifactSource {
        match self {
            ExecutionStrategy::Jar { jar, .. } => jar,
            ExecutionStrategy::PowerShellScript { script } => script,
            ExecutionStrategy::ShellScript { script } => script,
        }
    }
}

/// What the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyPreference {
    /// Jar if `DETECT_JAR` is set, otherwise a downloaded script for the
    /// host OS.
    Auto { java_home: Option<PathBuf> },
    LocalJar {
        jar: Option<PathBuf>,
        java_home: Option<PathBuf>,
    },
    PackagedScript {
        script: PathBuf,
        interpreter: Option<ScriptInterpreter>,
    },
    DownloadedArtifact {
        interpreter: Option<ScriptInterpreter>,
    },
}

impl StrategyPreference {
    /// Build the preference named by `kind` from the `[run]` section.
    pub fn from_run_section(run: &RunSection, kind: StrategyKind) -> Result<Self> {
        let pref = match kind {
            StrategyKind::Auto => StrategyPreference::Auto {
                java_home: run.java_home.clone(),
            },
            StrategyKind::LocalJar => StrategyPreference::LocalJar {
                jar: run.jar_path.clone(),
                java_home: run.java_home.clone(),
            },
            StrategyKind::PackagedScript => StrategyPreference::PackagedScript {
                script: run.script_path.clone().ok_or_else(|| {
                    ScanError::Config("packaged-script requires [run].script_path".to_string())
                })?,
                interpreter: run.interpreter,
            },
            StrategyKind::DownloadedArtifact => StrategyPreference::DownloadedArtifact {
                interpreter: run.interpreter,
            },
        };
        Ok(pref)
    }
}

/// Where downloadable scanner scripts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    pub shell_script_url: String,
    pub powershell_script_url: String,
}

impl DownloadConfig {
    pub fn script_url(&self, interpreter: ScriptInterpreter) -> &str {
        match interpreter {
            ScriptInterpreter::Bash => &self.shell_script_url,
            ScriptInterpreter::PowerShell => &self.powershell_script_url,
        }
    }
}

impl From<&DownloadSection> for DownloadConfig {
    fn from(section: &DownloadSection) -> Self {
        Self {
            shell_script_url: section.shell_script_url.clone(),
            powershell_script_url: section.powershell_script_url.clone(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self::from(&DownloadSection::default())
    }
}
