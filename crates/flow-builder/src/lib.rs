//! Flow Builder - dataflow graph construction for NiFi
//!
//! Turns a stage list (picked from a free-text description) or a template
//! document into a running process group. It supports:
//!
//! - Processor and process-group management with read-before-write revisions
//! - Relationship resolution and no-loss auto-termination merges
//! - Linear chains and explicit edge lists, with optional per-edge relationships
//! - Best-effort activation that reports failures instead of aborting
//!
//! # Architecture
//!
//! - `NodeRegistry`: processors and scopes, one fresh read before each write
//! - `GraphWiring`: connections between existing processors
//! - `LifecycleController`: terminal finalization and start/stop passes
//! - `FlowDeployer`: scope, nodes, wiring and activation for one deployment
//! - `FlowManager`: lookup, state control and export of deployed flows
//!
//! # Example
//!
//! ```ignore
//! use flow_builder::{FlowDeployer, NodeRegistry};
//! use nifi_client::{EngineClient, EngineConfig, HttpTransport};
//! use std::sync::Arc;
//!
//! let transport = HttpTransport::new(EngineConfig::from_env())?;
//! let registry = NodeRegistry::new(EngineClient::new(Arc::new(transport)));
//!
//! let report = FlowDeployer::new(registry)
//!     .deploy_description("Simple Logging Flow", "Generate data and log it")
//!     .await?;
//! println!("{}", report);
//! ```

pub mod deployer;
pub mod error;
pub mod lifecycle;
pub mod management;
pub mod plan;
pub mod registry;
pub mod relationships;
pub mod selector;
pub mod templates;
pub mod wiring;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types
pub use deployer::{DeploymentReport, FlowDeployer};
pub use error::{FlowError, Result};
pub use lifecycle::{ActivationReport, LifecycleController};
pub use management::{FlowDetails, FlowManager, FlowSummary};
pub use plan::{EdgeDeclaration, FlowBuildPlan, NodeDeclaration, PlanBuilder, Topology};
pub use registry::{NodeRegistry, ROOT_SCOPE};
pub use selector::{select_stages, Archetype, Role, StageSelection};
pub use templates::{TemplateDocument, TemplateLibrary, TemplateSummary};
pub use wiring::{Edge, GraphWiring, WiringReport};
