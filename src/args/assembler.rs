// src/args/assembler.rs

use std::fmt;

use tracing::warn;

use crate::env::{EnvironmentVariableSet, REDACTED};
use crate::errors::Result;
use crate::strategy::Escaper;
use crate::types::LogLevel;

use super::macros::expand_fragment;
use super::tokenize::{split_command_line, split_fragments};

/// Scanner property controlling its log level.
pub const LOGGING_LEVEL_KEY: &str = "logging.level.com.synopsys.integration";

/// Diagnostic property carrying the CI platform version.
pub const PLATFORM_VERSION_KEY: &str = "detect.phone.home.passthrough.jenkins.version";

/// Diagnostic property carrying this integration's version.
pub const PLUGIN_VERSION_KEY: &str = "detect.phone.home.passthrough.jenkins.plugin.version";

/// Values every command line ends with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MandatoryExtras {
    pub log_level: LogLevel,
    pub platform_version: String,
    pub plugin_version: String,
}

/// The scanner's full command line.
///
/// The last two elements are diagnostic arguments that
/// [`loggable`](Self::loggable) leaves out.
#[derive(Debug, Clone)]
pub struct ArgumentList {
    args: Vec<String>,
    diagnostics_from: usize,
    escaper: Escaper,
}

impl PartialEq for ArgumentList {
    fn eq(&self, other: &Self) -> bool {
        self.args == other.args && self.diagnostics_from == other.diagnostics_from
    }
}

impl Eq for ArgumentList {}

impl ArgumentList {
    /// Everything, in command-line order.
    pub fn as_slice(&self) -> &[String] {
        &self.args
    }

    /// The arguments shown in the pre-execution log line.
    pub fn loggable(&self) -> &[String] {
        &self.args[..self.diagnostics_from]
    }

    /// The trailing diagnostic arguments.
    pub fn diagnostics(&self) -> &[String] {
        &self.args[self.diagnostics_from..]
    }

    /// Loggable arguments joined by spaces, with any secret value from
    /// `env` masked both as written and in its escaped form.
    pub fn redacted_line(&self, env: &EnvironmentVariableSet) -> String {
        let mut line = self.loggable().join(" ");
        for (key, value) in env.iter() {
            if !env.is_secret(key) || value.is_empty() {
                continue;
            }
            let escaped = (self.escaper)(value);
            if !escaped.is_empty() {
                line = line.replace(&escaped, REDACTED);
            }
            line = line.replace(value, REDACTED);
        }
        line
    }

    pub fn program(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.args
    }
}

impl fmt::Display for ArgumentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.loggable().join(" "))
    }
}

/// Build the scanner command line.
///
/// 1. `prefix`, verbatim.
/// 2. Each fragment of `blob`: macros expanded, then escaped.
/// 3. `--logging.level...=<level>` unless a fragment already mentions the
///    logging key (`-Dlogging.level...=X` counts too).
/// 4. The two diagnostic version arguments.
///
/// Fails with `ArgumentParse` on unbalanced quotes.
pub fn assemble(
    prefix: &[String],
    escaper: Escaper,
    blob: &str,
    env: &EnvironmentVariableSet,
    extras: &MandatoryExtras,
) -> Result<ArgumentList> {
    let mut args: Vec<String> = prefix.to_vec();

    let fragments = if blob.trim().is_empty() {
        Vec::new()
    } else {
        split_fragments(blob)?
    };

    let mut logging_level_at: Option<usize> = None;
    for fragment in fragments {
        let expanded = expand_fragment(&fragment, env);
        if expanded.contains(LOGGING_LEVEL_KEY) {
            if let Some(previous) = logging_level_at.take() {
                warn!("{LOGGING_LEVEL_KEY} given more than once; using the last value");
                args.remove(previous);
            }
            logging_level_at = Some(args.len());
        }
        args.push(escaper(&expanded));
    }

    if logging_level_at.is_none() {
        args.push(format_property(
            escaper,
            LOGGING_LEVEL_KEY,
            extras.log_level.as_property_value(),
            env,
        )?);
    }

    let diagnostics_from = args.len();
    args.push(format_property(
        escaper,
        PLATFORM_VERSION_KEY,
        &extras.platform_version,
        env,
    )?);
    args.push(format_property(
        escaper,
        PLUGIN_VERSION_KEY,
        &extras.plugin_version,
        env,
    )?);

    Ok(ArgumentList {
        args,
        diagnostics_from,
        escaper,
    })
}

/// `--key=<value>` where the value goes through the same tokenize, expand
/// and escape steps as user properties. The key is left as is.
fn format_property(
    escaper: Escaper,
    key: &str,
    value: &str,
    env: &EnvironmentVariableSet,
) -> Result<String> {
    let escaped: String = split_command_line(value)?
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| escaper(&expand_fragment(t, env)))
        .collect();
    Ok(format!("--{key}={escaped}"))
}
