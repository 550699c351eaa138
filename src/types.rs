use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// Operating system family of the execution host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsKind {
    Linux,
    Mac,
    Windows,
}

impl OsKind {
    /// OS family of the machine this process runs on.
    pub fn current() -> Self {
        if cfg!(windows) {
            OsKind::Windows
        } else if cfg!(target_os = "macos") {
            OsKind::Mac
        } else {
            OsKind::Linux
        }
    }

    pub fn is_windows(self) -> bool {
        self == OsKind::Windows
    }

    /// Interpreter used for scripts when the caller expresses no preference.
    pub fn default_interpreter(self) -> ScriptInterpreter {
        match self {
            OsKind::Windows => ScriptInterpreter::PowerShell,
            OsKind::Linux | OsKind::Mac => ScriptInterpreter::Bash,
        }
    }
}

impl fmt::Display for OsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OsKind::Linux => "linux",
            OsKind::Mac => "mac",
            OsKind::Windows => "windows",
        };
        f.write_str(s)
    }
}

impl FromStr for OsKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linux" => Ok(OsKind::Linux),
            "mac" | "macos" | "darwin" => Ok(OsKind::Mac),
            "windows" => Ok(OsKind::Windows),
            other => Err(format!(
                "invalid operating system: {other} (expected \"linux\", \"mac\" or \"windows\")"
            )),
        }
    }
}

/// Interpreter a packaged or downloaded scanner script is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScriptInterpreter {
    Bash,
    #[value(name = "powershell")]
    PowerShell,
}

impl ScriptInterpreter {
    /// Whether a host of the given OS ships this interpreter.
    pub fn available_on(self, os: OsKind) -> bool {
        match self {
            ScriptInterpreter::Bash => !os.is_windows(),
            ScriptInterpreter::PowerShell => os.is_windows(),
        }
    }
}

impl fmt::Display for ScriptInterpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptInterpreter::Bash => f.write_str("bash"),
            ScriptInterpreter::PowerShell => f.write_str("powershell"),
        }
    }
}

/// How the scanner artifact is obtained, as named in config and on the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    /// Pick by host OS; a `DETECT_JAR` variable selects the jar.
    #[default]
    Auto,
    /// A scanner jar already present on the execution host.
    LocalJar,
    /// A scanner script already present on the execution host.
    PackagedScript,
    /// A scanner script fetched through the artifact manager.
    DownloadedArtifact,
}

/// Log level as exposed on the CLI and forwarded to the scanner.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Value the scanner expects for its logging-level property.
    pub fn as_property_value(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("invalid log level: {other}")),
        }
    }
}
