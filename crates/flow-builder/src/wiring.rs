//! Graph wiring: connections between existing nodes
//!
//! Every connection selects exactly one relationship of its source. Unless
//! the caller names one, it is resolved from a fresh read of the source node
//! (see [`crate::relationships::select_output`]).

use nifi_client::ConnectionId;

use crate::error::{FlowError, Result};
use crate::plan::{EdgeDeclaration, RealizedPlan, Topology};
use crate::registry::NodeRegistry;
use crate::relationships::select_output;

/// A connection created in the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: ConnectionId,
    pub source: String,
    pub target: String,
    pub relationship: String,
}

/// A declared connection that could not be created
#[derive(Debug)]
pub struct WiringFailure {
    /// Declared source name
    pub source: String,
    /// Declared target name
    pub target: String,
    pub error: FlowError,
}

/// Outcome of wiring a realized plan
#[derive(Debug, Default)]
pub struct WiringReport {
    pub connections: Vec<Edge>,
    /// Edges naming a node the plan does not contain
    pub skipped: Vec<EdgeDeclaration>,
    pub failures: Vec<WiringFailure>,
}

impl WiringReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.failures.is_empty()
    }
}

/// Creates connections through the node registry
#[derive(Clone)]
pub struct GraphWiring {
    registry: NodeRegistry,
}

impl GraphWiring {
    pub fn new(registry: NodeRegistry) -> Self {
        Self { registry }
    }

    /// Connect `source` to `target`, routing the source's first available relationship
    pub async fn connect(&self, source: &str, target: &str, scope: &str) -> Result<Edge> {
        let node = self.registry.read_node(source).await?;
        let relationship = select_output(&node)?;
        self.connect_via(source, target, &relationship, scope).await
    }

    /// Connect `source` to `target` routing a named relationship
    pub async fn connect_via(
        &self,
        source: &str,
        target: &str,
        relationship: &str,
        scope: &str,
    ) -> Result<Edge> {
        let connection = self
            .registry
            .client()
            .create_connection(scope, source, target, &[relationship.to_string()])
            .await?;
        log::info!(
            "Connected {} -> {} via '{}' ({})",
            source,
            target,
            relationship,
            connection.id
        );
        Ok(Edge {
            id: connection.id,
            source: source.to_string(),
            target: target.to_string(),
            relationship: relationship.to_string(),
        })
    }

    /// Connect consecutive pairs in order.
    ///
    /// Stops at the first failure with [`FlowError::ChainInterrupted`]
    /// carrying the index of the failed pair. Connections already created
    /// stay in place.
    pub async fn chain(&self, nodes: &[&str], scope: &str) -> Result<Vec<Edge>> {
        let mut edges = Vec::new();
        for (index, pair) in nodes.windows(2).enumerate() {
            let edge = self
                .connect(pair[0], pair[1], scope)
                .await
                .map_err(|cause| FlowError::ChainInterrupted {
                    index,
                    cause: Box::new(cause),
                })?;
            edges.push(edge);
        }
        Ok(edges)
    }

    /// Wire a realized plan.
    ///
    /// Chains walk declared neighbours in order: a pair with a node that was
    /// not created is skipped, never bridged, and the first failed connection
    /// stops the chain. Edge lists attempt every edge, skipping ones that name
    /// a node the plan lacks. Failures are logged and returned in the report
    /// rather than as an error.
    pub async fn wire_plan(&self, plan: &RealizedPlan) -> WiringReport {
        let mut report = WiringReport::default();
        match &plan.topology {
            Topology::Chain => {
                for (index, pair) in plan.nodes.windows(2).enumerate() {
                    let ((source_name, source), (target_name, target)) = (&pair[0], &pair[1]);
                    let (source, target) = match (source, target) {
                        (Some(s), Some(t)) => (s, t),
                        _ => {
                            log::warn!(
                                "Skipping connection {} -> {}: node not created",
                                source_name,
                                target_name
                            );
                            report.skipped.push(EdgeDeclaration {
                                source: source_name.clone(),
                                target: target_name.clone(),
                                relationship: None,
                            });
                            continue;
                        }
                    };

                    match self.connect(source, target, &plan.scope).await {
                        Ok(edge) => report.connections.push(edge),
                        Err(cause) => {
                            let error = FlowError::ChainInterrupted {
                                index,
                                cause: Box::new(cause),
                            };
                            log::warn!("Failed to wire chain: {}", error);
                            report.failures.push(WiringFailure {
                                source: source_name.clone(),
                                target: target_name.clone(),
                                error,
                            });
                            break;
                        }
                    }
                }
            }
            Topology::Edges(edges) => {
                for declared in edges {
                    let (source, target) = match (
                        plan.node_id(&declared.source),
                        plan.node_id(&declared.target),
                    ) {
                        (Some(s), Some(t)) => (s, t),
                        _ => {
                            log::warn!(
                                "Skipping connection {} -> {}: node not in plan",
                                declared.source,
                                declared.target
                            );
                            report.skipped.push(declared.clone());
                            continue;
                        }
                    };

                    let result = match &declared.relationship {
                        Some(rel) => self.connect_via(source, target, rel, &plan.scope).await,
                        None => self.connect(source, target, &plan.scope).await,
                    };
                    match result {
                        Ok(edge) => report.connections.push(edge),
                        Err(error) => {
                            log::warn!(
                                "Failed to connect {} -> {}: {}",
                                declared.source,
                                declared.target,
                                error
                            );
                            report.failures.push(WiringFailure {
                                source: declared.source.clone(),
                                target: declared.target.clone(),
                                error,
                            });
                        }
                    }
                }
            }
        }
        report
    }
}
