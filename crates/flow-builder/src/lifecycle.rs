//! Lifecycle controller: terminal finalization and best-effort activation
//!
//! Activation is a pass over nodes in order, not a transaction. A node that
//! fails to change state is logged and reported; the pass carries on with
//! the rest.

use nifi_client::{ProcessorEntity, ProcessorId, ProcessorState};

use crate::error::FlowError;
use crate::registry::NodeRegistry;

/// Relationship auto-terminated on the last node of a flow before it starts
pub const TERMINAL_RELATIONSHIP: &str = "success";

/// A node that could not be transitioned
#[derive(Debug)]
pub struct ActivationFailure {
    /// Role label or declared name
    pub role: String,
    pub node_id: ProcessorId,
    pub error: FlowError,
}

/// Outcome of a best-effort state pass
#[derive(Debug, Default)]
pub struct ActivationReport {
    /// (role, node id) in the order attempted
    pub started: Vec<(String, ProcessorId)>,
    pub failed: Vec<ActivationFailure>,
}

impl ActivationReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// Ids of the nodes that failed, in order
    pub fn failed_ids(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.node_id.as_str()).collect()
    }

    /// Ids of the nodes that transitioned, in order
    pub fn started_ids(&self) -> Vec<&str> {
        self.started.iter().map(|(_, id)| id.as_str()).collect()
    }
}

/// Drives node state for a built flow
#[derive(Clone)]
pub struct LifecycleController {
    registry: NodeRegistry,
}

impl LifecycleController {
    pub fn new(registry: NodeRegistry) -> Self {
        Self { registry }
    }

    /// Auto-terminate `names` on a node, keeping every other relationship's flag
    pub async fn finalize_terminal(
        &self,
        node_id: &str,
        names: &[&str],
    ) -> crate::error::Result<ProcessorEntity> {
        let entity = self.registry.auto_terminate(node_id, names).await?;
        log::info!(
            "Auto-terminated {:?} on {}",
            names,
            entity.display_name()
        );
        Ok(entity)
    }

    /// Start every node in order, finalizing the last one's terminal relationship first
    pub async fn start_all(&self, nodes: &[(String, ProcessorId)]) -> ActivationReport {
        self.pass(nodes, ProcessorState::Running, true).await
    }

    /// Move every node to `desired` without touching relationships
    pub async fn transition_all(
        &self,
        nodes: &[(String, ProcessorId)],
        desired: ProcessorState,
    ) -> ActivationReport {
        self.pass(nodes, desired, false).await
    }

    async fn pass(
        &self,
        nodes: &[(String, ProcessorId)],
        desired: ProcessorState,
        finalize_last: bool,
    ) -> ActivationReport {
        let mut report = ActivationReport::default();
        let last = nodes.len().saturating_sub(1);

        for (index, (role, node_id)) in nodes.iter().enumerate() {
            let result = async {
                if finalize_last && index == last {
                    self.finalize_terminal(node_id, &[TERMINAL_RELATIONSHIP]).await?;
                }
                self.registry.set_state(node_id, desired).await
            }
            .await;

            match result {
                Ok(_) => {
                    log::info!("Set {} ({}) to {}", role, node_id, desired);
                    report.started.push((role.clone(), node_id.clone()));
                }
                Err(error) => {
                    log::warn!("Failed to set {} ({}) to {}: {}", role, node_id, desired, error);
                    report.failed.push(ActivationFailure {
                        role: role.clone(),
                        node_id: node_id.clone(),
                        error,
                    });
                }
            }
        }
        report
    }
}
