// src/config/validate.rs

use crate::config::model::{ConfigFile, CredentialEntry, RawConfigFile, ServerSection};
use crate::env::server::no_proxy_globs;
use crate::errors::{Result, ScanError};
use crate::types::StrategyKind;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ScanError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_run(cfg)?;
    validate_servers(cfg)?;
    validate_proxy(cfg)?;
    validate_credentials(cfg)?;
    Ok(())
}

fn validate_run(cfg: &RawConfigFile) -> Result<()> {
    if cfg.run.strategy == StrategyKind::PackagedScript && cfg.run.script_path.is_none() {
        return Err(ScanError::Config(
            "[run].strategy = \"packaged-script\" requires [run].script_path".to_string(),
        ));
    }
    Ok(())
}

fn validate_servers(cfg: &RawConfigFile) -> Result<()> {
    let sections = [
        ("backend", cfg.server.backend.as_ref()),
        ("secondary", cfg.server.secondary.as_ref()),
    ];
    for (name, section) in sections {
        if let Some(section) = section {
            validate_server(name, section, cfg)?;
        }
    }
    Ok(())
}

fn validate_server(name: &str, section: &ServerSection, cfg: &RawConfigFile) -> Result<()> {
    if section.timeout == 0 {
        return Err(ScanError::Config(format!(
            "[server.{name}].timeout must be >= 1 (got 0)"
        )));
    }
    if let Some(id) = section.credentials_id.as_deref().map(str::trim) {
        if !id.is_empty() && !cfg.credentials.contains_key(id) {
            return Err(ScanError::Config(format!(
                "[server.{name}] references unknown credentials '{id}'"
            )));
        }
    }
    Ok(())
}

fn validate_proxy(cfg: &RawConfigFile) -> Result<()> {
    let Some(proxy) = cfg.proxy.as_ref() else {
        return Ok(());
    };

    let has_host = proxy.host.as_deref().is_some_and(|h| !h.trim().is_empty());
    if !has_host && proxy.port.is_some() {
        return Err(ScanError::Config(
            "[proxy].port is set but [proxy].host is empty".to_string(),
        ));
    }
    if let Some(id) = proxy.credentials_id.as_deref().map(str::trim) {
        match cfg.credentials.get(id) {
            Some(entry) if entry.has_token() => {
                return Err(ScanError::Config(format!(
                    "[proxy] credentials '{id}' must be a username/password pair"
                )));
            }
            None if !id.is_empty() => {
                return Err(ScanError::Config(format!(
                    "[proxy] references unknown credentials '{id}'"
                )));
            }
            _ => {}
        }
    }

    no_proxy_globs(&proxy.no_proxy_hosts)?;
    Ok(())
}

fn validate_credentials(cfg: &RawConfigFile) -> Result<()> {
    for (id, entry) in cfg.credentials.iter() {
        validate_credential_entry(id, entry)?;
    }
    Ok(())
}

fn validate_credential_entry(id: &str, entry: &CredentialEntry) -> Result<()> {
    if entry.has_token() && entry.has_username_password() {
        return Err(ScanError::Config(format!(
            "[credentials.{id}] must hold either a token or a username/password pair, not both"
        )));
    }
    if entry.token.is_some() && entry.token_env.is_some() {
        return Err(ScanError::Config(format!(
            "[credentials.{id}] sets both token and token_env"
        )));
    }
    if entry.password.is_some() && entry.password_env.is_some() {
        return Err(ScanError::Config(format!(
            "[credentials.{id}] sets both password and password_env"
        )));
    }
    if entry.has_username_password() && entry.username.is_none() {
        return Err(ScanError::Config(format!(
            "[credentials.{id}] has a password but no username"
        )));
    }
    if entry.username.is_some() && entry.password.is_none() && entry.password_env.is_none() {
        return Err(ScanError::Config(format!(
            "[credentials.{id}] has a username but no password"
        )));
    }
    if !entry.has_token() && !entry.has_username_password() {
        return Err(ScanError::Config(format!(
            "[credentials.{id}] is empty"
        )));
    }
    Ok(())
}
