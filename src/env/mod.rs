// src/env/mod.rs

//! Environment composition for the scanner process.
//!
//! - [`variables`] holds the ordered [`EnvironmentVariableSet`].
//! - [`server`] resolves config sections into [`ServerConfig`] values.
//! - [`keys`] names the variables each server is exported under.
//! - [`composer`] layers everything into the final set.

pub mod composer;
pub mod keys;
pub mod server;
pub mod variables;

pub use composer::{base_environment, compose, server_variables};
pub use keys::{BACKEND, SECONDARY, ServiceKeys};
pub use server::{Credentials, ProxySettings, Secret, ServerConfig, resolve_server_config};
pub use variables::{EnvironmentVariableSet, REDACTED};
