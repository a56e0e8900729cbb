//! Connection configuration for the engine client

use std::time::Duration;

use crate::constants::{defaults, env};

/// Credentials attached to every request
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// `Authorization: Bearer <token>`
    Bearer(String),
    /// `Authorization: Basic <base64(user:password)>`
    Basic { username: String, password: String },
    /// No `Authorization` header
    #[default]
    None,
}

impl Credentials {
    /// Pick credentials in precedence order: token, then username/password, then none.
    ///
    /// Empty values count as unset.
    pub fn resolve(
        token: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        match (non_empty(token), non_empty(username), non_empty(password)) {
            (Some(token), _, _) => Credentials::Bearer(token),
            (None, Some(username), Some(password)) => Credentials::Basic { username, password },
            _ => Credentials::None,
        }
    }

    /// Short label for logs, never includes the secret
    pub fn kind(&self) -> &'static str {
        match self {
            Credentials::Bearer(_) => "bearer",
            Credentials::Basic { .. } => "basic",
            Credentials::None => "none",
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Bearer(_) => f.write_str("Bearer(***)"),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Credentials::None => f.write_str("None"),
        }
    }
}

/// Engine client configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Scheme, host and port of the engine (e.g. `http://localhost:8080`)
    pub base_url: String,
    /// REST prefix joined between the base URL and every resource path
    pub api_prefix: String,
    /// Credentials sent with every call
    pub credentials: Credentials,
    /// Per-request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,
    /// Accept self-signed or otherwise invalid TLS certificates
    pub accept_invalid_certs: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            api_prefix: defaults::API_PREFIX.to_string(),
            credentials: Credentials::None,
            timeout: None,
            accept_invalid_certs: false,
        }
    }
}

impl EngineConfig {
    /// Build configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(env::URL)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| defaults::BASE_URL.to_string());
        let credentials =
            Credentials::resolve(lookup(env::TOKEN), lookup(env::USERNAME), lookup(env::PASSWORD));
        let accept_invalid_certs = lookup(env::INSECURE)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            base_url,
            credentials,
            accept_invalid_certs,
            ..Self::default()
        }
    }

    /// Override the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set a per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Accept invalid TLS certificates
    pub fn insecure(mut self, accept_invalid_certs: bool) -> Self {
        self.accept_invalid_certs = accept_invalid_certs;
        self
    }

    /// Absolute URL of a resource path such as `/processors/{id}`
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.api_prefix.trim_matches('/');
        let path = path.trim_start_matches('/');
        if prefix.is_empty() {
            format!("{}/{}", base, path)
        } else {
            format!("{}/{}/{}", base, prefix, path)
        }
    }
}
