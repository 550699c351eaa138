// src/config/model.rs

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

use crate::env::REDACTED;
use crate::types::{ScriptInterpreter, StrategyKind};

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CANCEL_GRACE_SECS: u64 = 10;
pub const DEFAULT_SHELL_SCRIPT_URL: &str = "https://detect.synopsys.com/detect.sh";
pub const DEFAULT_POWERSHELL_SCRIPT_URL: &str = "https://detect.synopsys.com/detect.ps1";

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [run]
/// strategy = "downloaded-artifact"
/// properties = "--detect.project.name=demo --detect.source.path=$WORKSPACE"
///
/// [server.backend]
/// url = "https://scan.example.com"
/// credentials_id = "scan-token"
///
/// [proxy]
/// host = "proxy.internal"
/// port = 3128
/// no_proxy_hosts = ["*.internal"]
///
/// [credentials.scan-token]
/// token_env = "SCAN_TOKEN"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub run: RunSection,

    #[serde(default)]
    pub download: DownloadSection,

    #[serde(default)]
    pub server: ServersSection,

    #[serde(default)]
    pub proxy: Option<ProxySection>,

    /// Credentials referenced by `credentials_id`, keyed by id.
    #[serde(default)]
    pub credentials: BTreeMap<String, CredentialEntry>,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub run: RunSection,
    pub download: DownloadSection,
    pub server: ServersSection,
    pub proxy: Option<ProxySection>,
    pub credentials: BTreeMap<String, CredentialEntry>,
}

impl ConfigFile {
    /// Skip validation. Used by `TryFrom<RawConfigFile>` once checks pass.
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            run: raw.run,
            download: raw.download,
            server: raw.server,
            proxy: raw.proxy,
            credentials: raw.credentials,
        }
    }
}

/// `[run]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RunSection {
    /// Scanner properties blob, possibly multi-line.
    #[serde(default)]
    pub properties: String,

    #[serde(default)]
    pub strategy: StrategyKind,

    /// Scanner jar for `local-jar`. Falls back to `DETECT_JAR`.
    #[serde(default)]
    pub jar_path: Option<PathBuf>,

    /// JDK used for the jar; `JAVA_HOME` or `java` on the PATH otherwise.
    #[serde(default)]
    pub java_home: Option<PathBuf>,

    /// Installed script for `packaged-script`.
    #[serde(default)]
    pub script_path: Option<PathBuf>,

    /// Force a script interpreter instead of picking by host OS.
    #[serde(default)]
    pub interpreter: Option<ScriptInterpreter>,

    #[serde(default)]
    pub working_directory: Option<PathBuf>,

    /// Seconds between SIGTERM and SIGKILL when a run is cancelled.
    #[serde(default = "default_cancel_grace_secs")]
    pub cancel_grace_secs: u64,
}

fn default_cancel_grace_secs() -> u64 {
    DEFAULT_CANCEL_GRACE_SECS
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            properties: String::new(),
            strategy: StrategyKind::default(),
            jar_path: None,
            java_home: None,
            script_path: None,
            interpreter: None,
            working_directory: None,
            cancel_grace_secs: default_cancel_grace_secs(),
        }
    }
}

/// `[download]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadSection {
    #[serde(default = "default_shell_script_url")]
    pub shell_script_url: String,

    #[serde(default = "default_powershell_script_url")]
    pub powershell_script_url: String,

    /// Where downloaded artifacts are cached; also handed to scripts as
    /// their jar download directory.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

fn default_shell_script_url() -> String {
    DEFAULT_SHELL_SCRIPT_URL.to_string()
}

fn default_powershell_script_url() -> String {
    DEFAULT_POWERSHELL_SCRIPT_URL.to_string()
}

impl Default for DownloadSection {
    fn default() -> Self {
        Self {
            shell_script_url: default_shell_script_url(),
            powershell_script_url: default_powershell_script_url(),
            download_dir: None,
        }
    }
}

/// `[server.backend]` and `[server.secondary]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServersSection {
    #[serde(default)]
    pub backend: Option<ServerSection>,

    #[serde(default)]
    pub secondary: Option<ServerSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub credentials_id: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub trust_certificates: bool,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            url: None,
            credentials_id: None,
            timeout: default_timeout(),
            trust_certificates: false,
        }
    }
}

/// `[proxy]` section, shared by all servers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxySection {
    #[serde(default)]
    pub host: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    /// Username/password credentials for the proxy.
    #[serde(default)]
    pub credentials_id: Option<String>,

    #[serde(default)]
    pub ntlm_domain: Option<String>,

    #[serde(default)]
    pub ntlm_workstation: Option<String>,

    /// Glob patterns of server hosts reached without the proxy.
    #[serde(default)]
    pub no_proxy_hosts: Vec<String>,
}

/// `[credentials.<id>]`: a username/password pair or a token.
///
/// Secret values may be given literally or read from the process
/// environment through the `*_env` variants.
#[derive(Clone, Default, Deserialize)]
pub struct CredentialEntry {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub password_env: Option<String>,

    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub token_env: Option<String>,
}

impl fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked = |v: &Option<String>| v.as_ref().map(|_| REDACTED);
        f.debug_struct("CredentialEntry")
            .field("username", &self.username)
            .field("password", &masked(&self.password))
            .field("password_env", &self.password_env)
            .field("token", &masked(&self.token))
            .field("token_env", &self.token_env)
            .finish()
    }
}

impl CredentialEntry {
    pub fn has_token(&self) -> bool {
        self.token.is_some() || self.token_env.is_some()
    }

    pub fn has_username_password(&self) -> bool {
        self.username.is_some() || self.password.is_some() || self.password_env.is_some()
    }
}
