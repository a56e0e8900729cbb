//! NiFi control-plane client
//!
//! A thin, authenticated RPC layer over the NiFi REST API. Everything that
//! talks to the engine goes through the [`EngineTransport`] trait so that the
//! graph-building layers above can run against a real server or an
//! in-memory stand-in.
//!
//! - [`HttpTransport`]: reqwest-backed transport that attaches credentials
//! - [`EngineClient`]: typed operations (process groups, processors, connections)
//! - [`EngineConfig`]: base URL, credentials, timeout, TLS leniency
//!
//! # Example
//!
//! ```rust,ignore
//! use nifi_client::{EngineClient, EngineConfig, HttpTransport};
//! use std::sync::Arc;
//!
//! let config = EngineConfig::from_env();
//! let transport = HttpTransport::new(config)?;
//! let client = EngineClient::new(Arc::new(transport));
//!
//! let group = client.create_process_group("root", "Ingest").await?;
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::EngineClient;
pub use config::{Credentials, EngineConfig};
pub use error::{EngineError, Result};
pub use transport::{EngineTransport, HttpTransport};
pub use types::{
    ConnectionEntity, ConnectionId, GroupId, ProcessGroupEntity, ProcessorEntity, ProcessorId,
    ProcessorState, Relationship, Revision,
};

/// HTTP method re-exported so transport implementors don't need a direct reqwest dependency
pub use reqwest::Method;
