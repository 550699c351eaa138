// src/env/server.rs

//! Per-run server configuration with resolved credentials.

use std::fmt;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;

use crate::config::model::{ProxySection, ServerSection};
use crate::errors::{Result, ScanError};
use crate::platform::CredentialStore;

use super::variables::REDACTED;

/// A string that never prints its contents.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({REDACTED})")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

/// Exactly one way of authenticating to a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    UsernamePassword { username: String, password: Secret },
    ApiToken(Secret),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<Secret>,
    pub ntlm_domain: Option<String>,
    pub ntlm_workstation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub url: Option<String>,
    pub credentials: Option<Credentials>,
    pub trust_certificates: bool,
    pub timeout_secs: u64,
    pub proxy: Option<ProxySettings>,
}

impl ServerConfig {
    /// A server with just a URL and defaults for everything else.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            credentials: None,
            trust_certificates: false,
            timeout_secs: crate::config::model::DEFAULT_TIMEOUT_SECS,
            proxy: None,
        }
    }
}

/// Build the run's view of one server section.
///
/// A blank or missing `credentials_id` yields a config without credentials;
/// an id the store does not know fails with `CredentialNotFound`.
pub fn resolve_server_config(
    section: &ServerSection,
    proxy: Option<&ProxySection>,
    store: &dyn CredentialStore,
) -> Result<ServerConfig> {
    let credentials = match non_blank(section.credentials_id.as_deref()) {
        Some(id) => Some(store.credentials(id)?),
        None => None,
    };

    let url = non_blank(section.url.as_deref()).map(str::to_string);

    let proxy = match proxy {
        Some(p) if !bypasses_proxy(url.as_deref(), &p.no_proxy_hosts)? => {
            resolve_proxy(p, store)?
        }
        Some(_) => {
            debug!(url = ?url, "server host matches no_proxy_hosts; not using proxy");
            None
        }
        None => None,
    };

    Ok(ServerConfig {
        url,
        credentials,
        trust_certificates: section.trust_certificates,
        timeout_secs: section.timeout,
        proxy,
    })
}

fn resolve_proxy(section: &ProxySection, store: &dyn CredentialStore) -> Result<Option<ProxySettings>> {
    let Some(host) = non_blank(section.host.as_deref()) else {
        return Ok(None);
    };

    let (username, password) = match non_blank(section.credentials_id.as_deref()) {
        Some(id) => match store.credentials(id)? {
            Credentials::UsernamePassword { username, password } => (Some(username), Some(password)),
            Credentials::ApiToken(_) => {
                return Err(ScanError::Config(format!(
                    "proxy credentials '{id}' must be a username/password pair, not a token"
                )));
            }
        },
        None => (None, None),
    };

    Ok(Some(ProxySettings {
        host: host.to_string(),
        port: section.port,
        username,
        password,
        ntlm_domain: non_blank(section.ntlm_domain.as_deref()).map(str::to_string),
        ntlm_workstation: non_blank(section.ntlm_workstation.as_deref()).map(str::to_string),
    }))
}

/// Whether the host of `url` matches one of the no-proxy glob patterns.
fn bypasses_proxy(url: Option<&str>, patterns: &[String]) -> Result<bool> {
    let Some(host) = url.and_then(url_host) else {
        return Ok(false);
    };
    if patterns.is_empty() {
        return Ok(false);
    }
    Ok(no_proxy_globs(patterns)?.is_match(host))
}

pub(crate) fn no_proxy_globs(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern.trim())
            .case_insensitive(true)
            .build()
            .map_err(|e| ScanError::Config(format!("invalid no_proxy_hosts pattern '{pattern}': {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| ScanError::Config(format!("building no_proxy_hosts matcher: {e}")))
}

/// Host part of a URL such as `https://user@scan.example.com:8443/api`.
pub fn url_host(url: &str) -> Option<&str> {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, h)| h);

    let host = if let Some(bracketed) = host_port.strip_prefix('[') {
        bracketed.split(']').next()?
    } else {
        host_port.split(':').next()?
    };

    if host.is_empty() { None } else { Some(host) }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
