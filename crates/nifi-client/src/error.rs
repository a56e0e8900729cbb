//! Error types for the engine client

use thiserror::Error;

/// Result type alias using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while talking to the engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request never produced an HTTP response (connection refused, DNS, TLS, timeout)
    #[error("Transport error: {cause}")]
    Transport { cause: String },

    /// The engine answered with a non-2xx status.
    ///
    /// Covers revision conflicts, unknown processor types and unsatisfied
    /// dependencies alike; the body is kept verbatim.
    #[error("Engine rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Client could not be configured
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Create a transport error from any displayable cause
    pub fn transport(cause: impl std::fmt::Display) -> Self {
        Self::Transport {
            cause: cause.to_string(),
        }
    }

    /// Create a rejection with the engine's status and body
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            body: body.into(),
        }
    }

    /// HTTP status of a rejection, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the engine refused the call because the revision was stale
    pub fn is_revision_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// Whether the engine reported that the resource does not exist
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err)
    }
}
