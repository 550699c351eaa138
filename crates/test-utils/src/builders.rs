#![allow(dead_code)]

use std::path::PathBuf;

use scanrun::config::{
    ConfigFile, CredentialEntry, ProxySection, RawConfigFile, ServerSection,
};
use scanrun::types::{ScriptInterpreter, StrategyKind};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn properties(mut self, blob: &str) -> Self {
        self.config.run.properties = blob.to_string();
        self
    }

    pub fn strategy(mut self, kind: StrategyKind) -> Self {
        self.config.run.strategy = kind;
        self
    }

    pub fn jar_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.run.jar_path = Some(path.into());
        self
    }

    pub fn script_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.run.script_path = Some(path.into());
        self
    }

    pub fn interpreter(mut self, interpreter: ScriptInterpreter) -> Self {
        self.config.run.interpreter = Some(interpreter);
        self
    }

    pub fn download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.download.download_dir = Some(dir.into());
        self
    }

    pub fn backend(mut self, server: ServerSection) -> Self {
        self.config.server.backend = Some(server);
        self
    }

    pub fn secondary(mut self, server: ServerSection) -> Self {
        self.config.server.secondary = Some(server);
        self
    }

    pub fn proxy(mut self, proxy: ProxySection) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    pub fn credentials(mut self, id: &str, entry: CredentialEntry) -> Self {
        self.config.credentials.insert(id.to_string(), entry);
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ServerSection`.
pub struct ServerSectionBuilder {
    server: ServerSection,
}

impl ServerSectionBuilder {
    pub fn new(url: &str) -> Self {
        Self {
            server: ServerSection {
                url: Some(url.to_string()),
                ..ServerSection::default()
            },
        }
    }

    pub fn credentials(mut self, id: &str) -> Self {
        self.server.credentials_id = Some(id.to_string());
        self
    }

    pub fn timeout(mut self, secs: u64) -> Self {
        self.server.timeout = secs;
        self
    }

    pub fn trust_certificates(mut self, val: bool) -> Self {
        self.server.trust_certificates = val;
        self
    }

    pub fn build(self) -> ServerSection {
        self.server
    }
}

/// Builder for `ProxySection`.
pub struct ProxySectionBuilder {
    proxy: ProxySection,
}

impl ProxySectionBuilder {
    pub fn new(host: &str) -> Self {
        Self {
            proxy: ProxySection {
                host: Some(host.to_string()),
                ..ProxySection::default()
            },
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.proxy.port = Some(port);
        self
    }

    pub fn credentials(mut self, id: &str) -> Self {
        self.proxy.credentials_id = Some(id.to_string());
        self
    }

    pub fn ntlm(mut self, domain: &str, workstation: &str) -> Self {
        self.proxy.ntlm_domain = Some(domain.to_string());
        self.proxy.ntlm_workstation = Some(workstation.to_string());
        self
    }

    pub fn no_proxy(mut self, pattern: &str) -> Self {
        self.proxy.no_proxy_hosts.push(pattern.to_string());
        self
    }

    pub fn build(self) -> ProxySection {
        self.proxy
    }
}

/// `[credentials.<id>]` entry holding a literal token.
pub fn token_entry(token: &str) -> CredentialEntry {
    CredentialEntry {
        token: Some(token.to_string()),
        ..CredentialEntry::default()
    }
}

/// `[credentials.<id>]` entry holding a literal username/password pair.
pub fn user_entry(username: &str, password: &str) -> CredentialEntry {
    CredentialEntry {
        username: Some(username.to_string()),
        password: Some(password.to_string()),
        ..CredentialEntry::default()
    }
}
