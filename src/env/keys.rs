// src/env/keys.rs

//! Environment variable names the scanner reads its server settings from.

/// Key set for one server the scanner talks to.
///
/// Every key is `<prefix>_<SUFFIX>`, except the token key which differs
/// between services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceKeys {
    pub prefix: &'static str,
    pub token_suffix: &'static str,
}

/// The scanner's primary backend.
pub const BACKEND: ServiceKeys = ServiceKeys {
    prefix: "BLACKDUCK",
    token_suffix: "API_TOKEN",
};

/// The secondary analysis service.
pub const SECONDARY: ServiceKeys = ServiceKeys {
    prefix: "POLARIS",
    token_suffix: "ACCESS_TOKEN",
};

impl ServiceKeys {
    fn key(&self, suffix: &str) -> String {
        format!("{}_{}", self.prefix, suffix)
    }

    pub fn url(&self) -> String {
        self.key("URL")
    }

    pub fn timeout(&self) -> String {
        self.key("TIMEOUT")
    }

    pub fn trust_cert(&self) -> String {
        self.key("TRUST_CERT")
    }

    pub fn username(&self) -> String {
        self.key("USERNAME")
    }

    pub fn password(&self) -> String {
        self.key("PASSWORD")
    }

    pub fn token(&self) -> String {
        self.key(self.token_suffix)
    }

    pub fn proxy_host(&self) -> String {
        self.key("PROXY_HOST")
    }

    pub fn proxy_port(&self) -> String {
        self.key("PROXY_PORT")
    }

    pub fn proxy_username(&self) -> String {
        self.key("PROXY_USERNAME")
    }

    pub fn proxy_password(&self) -> String {
        self.key("PROXY_PASSWORD")
    }

    pub fn proxy_ntlm_domain(&self) -> String {
        self.key("PROXY_NTLM_DOMAIN")
    }

    pub fn proxy_ntlm_workstation(&self) -> String {
        self.key("PROXY_NTLM_WORKSTATION")
    }

    /// All proxy-related keys, in the order they are emitted.
    pub fn proxy_keys(&self) -> [String; 6] {
        [
            self.proxy_host(),
            self.proxy_port(),
            self.proxy_username(),
            self.proxy_password(),
            self.proxy_ntlm_domain(),
            self.proxy_ntlm_workstation(),
        ]
    }
}
