// src/platform/local.rs

use std::path::PathBuf;

use crate::errors::Result;
use crate::types::OsKind;

use super::CiPlatform;

/// Variable the CI platform uses for the job workspace.
pub const WORKSPACE_VAR: &str = "WORKSPACE";

/// Variables checked, in order, for the CI platform's version.
pub const PLATFORM_VERSION_VARS: [&str; 2] = ["CI_PLATFORM_VERSION", "JENKINS_VERSION"];

/// Platform facts for a run on the current machine.
#[derive(Debug, Clone, Default)]
pub struct LocalPlatform {
    workspace: Option<PathBuf>,
}

impl LocalPlatform {
    pub fn new(workspace: Option<PathBuf>) -> Self {
        Self { workspace }
    }
}

impl CiPlatform for LocalPlatform {
    fn remote_operating_system(&self) -> OsKind {
        OsKind::current()
    }

    fn working_directory(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.workspace {
            return Ok(dir.clone());
        }
        match std::env::var(WORKSPACE_VAR) {
            Ok(dir) if !dir.trim().is_empty() => Ok(PathBuf::from(dir)),
            _ => Ok(std::env::current_dir()?),
        }
    }

    fn plugin_version(&self) -> Option<String> {
        Some(env!("CARGO_PKG_VERSION").to_string())
    }

    fn platform_version(&self) -> Option<String> {
        PLATFORM_VERSION_VARS
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|v| !v.trim().is_empty())
    }

    fn environment(&self) -> Vec<(String, String)> {
        match self.working_directory() {
            Ok(dir) => vec![(WORKSPACE_VAR.to_string(), dir.display().to_string())],
            Err(_) => Vec::new(),
        }
    }
}
