//! Error types for the flow builder

use std::path::PathBuf;

use nifi_client::EngineError;
use thiserror::Error;

/// Result type alias using FlowError
pub type Result<T> = std::result::Result<T, FlowError>;

/// Errors that can occur while building or managing a flow
#[derive(Debug, Error)]
pub enum FlowError {
    /// Error from the engine control plane (transport failure or rejection)
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Every relationship of the source node is auto-terminated
    #[error("No available relationship on node {node_id}")]
    NoAvailableRelationship { node_id: String },

    /// A chain stopped at the connection between `nodes[index]` and `nodes[index + 1]`
    #[error("Chain interrupted at connection {index}: {cause}")]
    ChainInterrupted {
        index: usize,
        #[source]
        cause: Box<FlowError>,
    },

    /// No template with this name was loaded
    #[error("Template '{0}' not found")]
    TemplateNotFound(String),

    /// No flow (process group) with this name exists
    #[error("Flow '{0}' not found")]
    FlowNotFound(String),

    /// A template document could not be parsed
    #[error("Invalid template {path}: {reason}")]
    InvalidTemplate { path: PathBuf, reason: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FlowError {
    /// Engine error underneath this one, looking through chain interruptions
    pub fn engine_error(&self) -> Option<&EngineError> {
        match self {
            FlowError::Engine(e) => Some(e),
            FlowError::ChainInterrupted { cause, .. } => cause.engine_error(),
            _ => None,
        }
    }
}
