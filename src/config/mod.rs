// src/config/mod.rs

//! Configuration loading and validation for scanrun.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate credentials, server and proxy sections (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, parse_str};
pub use model::{
    ConfigFile, CredentialEntry, DownloadSection, ProxySection, RawConfigFile, RunSection,
    ServerSection, ServersSection,
};
