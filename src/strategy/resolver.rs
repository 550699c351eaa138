// src/strategy/resolver.rs

use std::path::PathBuf;

use tracing::info;

use crate::env::EnvironmentVariableSet;
use crate::errors::{Result, ScanError};
use crate::types::{OsKind, ScriptInterpreter};

use super::{ArtifactSource, DownloadConfig, ExecutionStrategy, JAR_PATH_VAR, StrategyPreference};

/// Decide how the scanner is started on a host running `os`.
///
/// An explicit preference is honoured or rejected, never swapped for
/// another strategy. `Auto` uses a jar named by `DETECT_JAR` and otherwise
/// downloads the script matching the host OS.
pub fn resolve(
    env: &EnvironmentVariableSet,
    os: OsKind,
    preference: &StrategyPreference,
    download: &DownloadConfig,
) -> Result<ExecutionStrategy> {
    let strategy = match preference {
        StrategyPreference::Auto { java_home } => match env.get_non_blank(JAR_PATH_VAR) {
            Some(jar) => jar_strategy(PathBuf::from(jar), java_home.clone(), os),
            None => {
                let interpreter = os.default_interpreter();
                let url = download.script_url(interpreter).to_string();
                script_strategy(interpreter, ArtifactSource::Download(url), os)?
            }
        },

        StrategyPreference::LocalJar { jar, java_home } => {
            let jar = jar
                .clone()
                .or_else(|| env.get_non_blank(JAR_PATH_VAR).map(PathBuf::from))
                .ok_or_else(|| {
                    ScanError::Config(format!(
                        "local-jar needs [run].jar_path or a {JAR_PATH_VAR} variable"
                    ))
                })?;
            jar_strategy(jar, java_home.clone(), os)
        }

        StrategyPreference::PackagedScript { script, interpreter } => {
            let interpreter = interpreter.unwrap_or_else(|| os.default_interpreter());
            script_strategy(interpreter, ArtifactSource::Installed(script.clone()), os)?
        }

        StrategyPreference::DownloadedArtifact { interpreter } => {
            let interpreter = interpreter.unwrap_or_else(|| os.default_interpreter());
            let url = download.script_url(interpreter).to_string();
            script_strategy(interpreter, ArtifactSource::Download(url), os)?
        }
    };

    info!(
        strategy = strategy.name(),
        os = %os,
        artifact = ?strategy.artifact(),
        "resolved execution strategy"
    );
    Ok(strategy)
}

fn jar_strategy(jar: PathBuf, java_home: Option<PathBuf>, os: OsKind) -> ExecutionStrategy {
    ExecutionStrategy::Jar {
        jar: ArtifactSource::Installed(jar),
        java_home,
        target_os: os,
    }
}

fn script_strategy(
    interpreter: ScriptInterpreter,
    script: ArtifactSource,
    os: OsKind,
) -> Result<ExecutionStrategy> {
    if !interpreter.available_on(os) {
        return Err(ScanError::UnsupportedStrategy { interpreter, os });
    }
    Ok(match interpreter {
        ScriptInterpreter::Bash => ExecutionStrategy::ShellScript { script },
        ScriptInterpreter::PowerShell => ExecutionStrategy::PowerShellScript { script },
    })
}
