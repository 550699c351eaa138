// src/platform/credentials.rs

//! Credential store backed by the `[credentials.<id>]` config sections.

use std::collections::BTreeMap;

use crate::config::model::CredentialEntry;
use crate::env::{Credentials, EnvironmentVariableSet, Secret};
use crate::errors::{Result, ScanError};

use super::CredentialStore;

/// Resolves ids against config entries; `*_env` indirections read from the
/// environment snapshot taken at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialStore {
    entries: BTreeMap<String, CredentialEntry>,
    env: EnvironmentVariableSet,
}

impl StaticCredentialStore {
    pub fn new(entries: BTreeMap<String, CredentialEntry>, env: EnvironmentVariableSet) -> Self {
        Self { entries, env }
    }

    fn secret(&self, id: &str, literal: Option<&str>, env_key: Option<&str>) -> Result<Secret> {
        if let Some(value) = literal {
            return Ok(Secret::new(value));
        }
        let Some(key) = env_key else {
            return Err(ScanError::CredentialNotFound(format!(
                "credentials '{id}' have no secret value"
            )));
        };
        self.env
            .get_non_blank(key)
            .map(Secret::new)
            .ok_or_else(|| {
                ScanError::CredentialNotFound(format!(
                    "credentials '{id}' read from ${key}, which is not set"
                ))
            })
    }
}

impl CredentialStore for StaticCredentialStore {
    fn credentials(&self, id: &str) -> Result<Credentials> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| ScanError::CredentialNotFound(format!("no credentials with id '{id}'")))?;

        if entry.has_token() {
            let token = self.secret(id, entry.token.as_deref(), entry.token_env.as_deref())?;
            return Ok(Credentials::ApiToken(token));
        }

        let username = entry
            .username
            .clone()
            .ok_or_else(|| ScanError::CredentialNotFound(format!("credentials '{id}' have no username")))?;
        let password = self.secret(id, entry.password.as_deref(), entry.password_env.as_deref())?;
        Ok(Credentials::UsernamePassword { username, password })
    }
}
