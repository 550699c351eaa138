// src/errors.rs

//! Crate-wide error type.
//!
//! Everything here is detected *before* a scanner process exists. Failures
//! of the process itself are reported as an [`ExecutionOutcome`] value
//! instead.
//!
//! [`ExecutionOutcome`]: crate::exec::ExecutionOutcome

use thiserror::Error;

use crate::types::{OsKind, ScriptInterpreter};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{interpreter} scripts cannot run on a {os} execution host")]
    UnsupportedStrategy {
        interpreter: ScriptInterpreter,
        os: OsKind,
    },

    #[error("Setup failed: {0}")]
    SetupFailed(String),

    #[error("Could not parse scanner properties: {0}")]
    ArgumentParse(String),

    #[error("Credentials not found: {0}")]
    CredentialNotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ScanError>;
