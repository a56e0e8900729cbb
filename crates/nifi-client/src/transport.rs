//! Transport abstraction over the engine's REST surface
//!
//! [`EngineTransport`] is the seam between typed operations and the wire. The
//! production implementation is [`HttpTransport`]; tests plug in an in-memory
//! engine instead.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::config::{Credentials, EngineConfig};
use crate::error::{EngineError, Result};

/// A single authenticated JSON round trip against the engine.
///
/// `path` is relative to the API prefix (e.g. `/processors/{id}`) and may
/// carry a query string. Implementations must map non-2xx answers to
/// [`EngineError::Rejected`] and connection failures to
/// [`EngineError::Transport`]. An empty response body is returned as
/// `Value::Null`.
#[async_trait]
pub trait EngineTransport: Send + Sync {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    http_client: reqwest::Client,
    config: EngineConfig,
}

impl HttpTransport {
    /// Create a transport for the given configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if config.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http_client = builder
            .build()
            .map_err(|e| EngineError::Config(e.to_string()))?;

        log::debug!(
            "Engine transport ready: {} (auth: {})",
            config.base_url,
            config.credentials.kind()
        );

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Configuration this transport was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build the outgoing request with credentials attached
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Request> {
        let url = self.config.endpoint(path);
        let mut request = self.http_client.request(method, url);

        request = match &self.config.credentials {
            Credentials::Bearer(token) => request.bearer_auth(token),
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Credentials::None => request,
        };

        if let Some(body) = body {
            request = request.json(body);
        }

        request.build().map_err(EngineError::from)
    }
}

#[async_trait]
impl EngineTransport for HttpTransport {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let request = self.build_request(method, path, body.as_ref())?;
        log::debug!("{} {}", request.method(), request.url());

        let response = self.http_client.execute(request).await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            log::debug!("Engine answered {}: {}", status.as_u16(), text);
            return Err(EngineError::rejected(status.as_u16(), text));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}
