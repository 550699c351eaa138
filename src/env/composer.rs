// src/env/composer.rs

//! Builds the environment the scanner process sees.
//!
//! Layers, lowest precedence first:
//! 1. inherited process environment
//! 2. CI platform variables
//! 3. server configuration (urls, credentials, proxy)
//! 4. strategy-specific variables (added after setup, see `runner`)
//!
//! Server values that are absent or blank are left out entirely so that the
//! scanner's own defaults still apply.

use tracing::debug;

use super::keys::ServiceKeys;
use super::server::{Credentials, ServerConfig};
use super::variables::EnvironmentVariableSet;

/// Inherited environment overlaid with the CI platform's variables.
pub fn base_environment<I, K, V>(
    inherited: EnvironmentVariableSet,
    platform: I,
) -> EnvironmentVariableSet
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut env = inherited;
    env.extend_layer(platform);
    env
}

/// Overlay the variables of every server on top of `base`.
pub fn compose(
    base: EnvironmentVariableSet,
    servers: &[(ServiceKeys, &ServerConfig)],
) -> EnvironmentVariableSet {
    let mut env = base;
    for (keys, config) in servers {
        let layer = server_variables(*keys, config);
        debug!(
            service = keys.prefix,
            keys = ?layer.keys().collect::<Vec<_>>(),
            "adding server variables"
        );
        env.merge(layer);
    }
    env
}

/// The variables describing a single server.
pub fn server_variables(keys: ServiceKeys, config: &ServerConfig) -> EnvironmentVariableSet {
    let mut layer = ServerLayer::default();

    layer.put(keys.url(), config.url.as_deref());
    layer.put(keys.timeout(), Some(&config.timeout_secs.to_string()));
    layer.put(keys.trust_cert(), Some(bool_str(config.trust_certificates)));

    match &config.credentials {
        Some(Credentials::UsernamePassword { username, password }) => {
            layer.put(keys.username(), Some(username));
            layer.put_secret(keys.password(), Some(password.expose()));
        }
        Some(Credentials::ApiToken(token)) => {
            layer.put_secret(keys.token(), Some(token.expose()));
        }
        None => {}
    }

    if let Some(proxy) = config.proxy.as_ref().filter(|p| !p.host.trim().is_empty()) {
        layer.put(keys.proxy_host(), Some(&proxy.host));
        layer.put(keys.proxy_port(), proxy.port.map(|p| p.to_string()).as_deref());
        layer.put(keys.proxy_username(), proxy.username.as_deref());
        layer.put_secret(
            keys.proxy_password(),
            proxy.password.as_ref().map(|p| p.expose()),
        );
        layer.put(keys.proxy_ntlm_domain(), proxy.ntlm_domain.as_deref());
        layer.put(keys.proxy_ntlm_workstation(), proxy.ntlm_workstation.as_deref());
    }

    layer.0
}

fn bool_str(b: bool) -> &'static str {
    if b { "true" } else { "false" }
}

#[derive(Default)]
struct ServerLayer(EnvironmentVariableSet);

impl ServerLayer {
    fn put(&mut self, key: String, value: Option<&str>) {
        if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
            self.0.insert(key, v);
        }
    }

    fn put_secret(&mut self, key: String, value: Option<&str>) {
        if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
            self.0.insert_secret(key, v);
        }
    }
}
