// src/strategy/setup.rs

//! Setup actions, run once per run on the execution host.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::EnvironmentVariableSet;
use crate::errors::{Result, ScanError};
use crate::platform::ArtifactDownloader;
use crate::types::OsKind;

use super::{ArtifactSource, ExecutionStrategy, JAR_DOWNLOAD_DIR_VAR, POWERSHELL_ENTRY_POINT};

/// Result of a strategy's setup action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedInvocation {
    /// Leading tokens that start the scanner; never escaped.
    pub prefix: Vec<String>,
    /// Strategy-specific variables, the top environment layer.
    pub environment: Vec<(String, String)>,
}

impl ExecutionStrategy {
    /// Prepare the artifact and compute the invocation prefix.
    ///
    /// Any failure is a `SetupFailed`; no other strategy is attempted.
    pub fn setup(
        &self,
        env: &EnvironmentVariableSet,
        downloader: &dyn ArtifactDownloader,
    ) -> Result<PreparedInvocation> {
        match self {
            ExecutionStrategy::Jar {
                jar,
                java_home,
                target_os,
            } => {
                let java = java_executable(java_home.as_deref(), env, *target_os)?;
                let jar = locate(jar, downloader)?;
                info!(java = %java, jar = %jar.display(), "running with java");
                Ok(PreparedInvocation {
                    prefix: vec![java, "-jar".to_string(), path_string(&jar)],
                    environment: Vec::new(),
                })
            }
            ExecutionStrategy::PowerShellScript { script } => {
                let script = locate(script, downloader)?;
                Ok(PreparedInvocation {
                    prefix: vec![
                        "powershell".to_string(),
                        format!(
                            "\"Import-Module '{}'; {POWERSHELL_ENTRY_POINT}\"",
                            path_string(&script)
                        ),
                    ],
                    environment: script_environment(downloader),
                })
            }
            ExecutionStrategy::ShellScript { script } => {
                let script = locate(script, downloader)?;
                Ok(PreparedInvocation {
                    prefix: vec!["bash".to_string(), path_string(&script)],
                    environment: script_environment(downloader),
                })
            }
        }
    }
}

fn locate(source: &ArtifactSource, downloader: &dyn ArtifactDownloader) -> Result<PathBuf> {
    match source {
        ArtifactSource::Installed(path) => {
            if path.is_file() {
                Ok(path.clone())
            } else {
                Err(ScanError::SetupFailed(format!(
                    "{} does not exist on the execution host",
                    path.display()
                )))
            }
        }
        ArtifactSource::Download(url) => {
            debug!(url = %url, "ensuring scanner artifact");
            downloader.ensure_artifact(url).map_err(|e| match e {
                ScanError::SetupFailed(_) => e,
                other => ScanError::SetupFailed(format!("fetching {url}: {other}")),
            })
        }
    }
}

/// `<home>/bin/java[.exe]` from the configured JDK or `JAVA_HOME`, else
/// plain `java` from the PATH.
fn java_executable(
    java_home: Option<&Path>,
    env: &EnvironmentVariableSet,
    os: OsKind,
) -> Result<String> {
    let home = java_home
        .map(Path::to_path_buf)
        .or_else(|| env.get_non_blank("JAVA_HOME").map(PathBuf::from));

    let Some(home) = home else {
        return Ok("java".to_string());
    };

    let binary = if os.is_windows() { "java.exe" } else { "java" };
    let java = home.join("bin").join(binary);

    // Remote targets are checked at spawn time.
    if os == OsKind::current() && !java.is_file() {
        return Err(ScanError::SetupFailed(format!(
            "no java executable at {}",
            java.display()
        )));
    }
    Ok(path_string(&java))
}

fn script_environment(downloader: &dyn ArtifactDownloader) -> Vec<(String, String)> {
    downloader
        .download_dir()
        .map(|dir| vec![(JAR_DOWNLOAD_DIR_VAR.to_string(), path_string(dir))])
        .unwrap_or_default()
}

fn path_string(path: &Path) -> String {
    path.display().to_string()
}
