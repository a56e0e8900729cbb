//! Client-wide constants
//!
//! Single source of truth for endpoint defaults and environment variable names.

/// Endpoint defaults
pub mod defaults {
    /// Engine URL used when `NIFI_URL` is not set
    pub const BASE_URL: &str = "http://localhost:8080";
    /// Path prefix of the REST API under the base URL
    pub const API_PREFIX: &str = "/nifi-api";
    /// Identifier the engine accepts for the top-level process group
    pub const ROOT_GROUP: &str = "root";
}

/// Environment variables read by [`crate::EngineConfig::from_env`]
pub mod env {
    pub const URL: &str = "NIFI_URL";
    pub const TOKEN: &str = "NIFI_TOKEN";
    pub const USERNAME: &str = "NIFI_USERNAME";
    pub const PASSWORD: &str = "NIFI_PASSWORD";
    /// Set to `true`/`1` to accept self-signed certificates
    pub const INSECURE: &str = "NIFI_INSECURE";
}
