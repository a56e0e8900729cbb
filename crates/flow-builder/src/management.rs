//! Operations on deployed flows
//!
//! A flow is a process group directly under the root, addressed by name.

use nifi_client::{GroupId, ProcessGroupEntity, ProcessorEntity, ProcessorState};
use serde_json::Value;

use crate::error::Result;
use crate::lifecycle::{ActivationReport, LifecycleController};
use crate::registry::{NodeRegistry, ROOT_SCOPE};

/// One row of the flow listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSummary {
    pub id: GroupId,
    pub name: String,
    pub running: u32,
    pub stopped: u32,
    pub invalid: u32,
}

impl From<&ProcessGroupEntity> for FlowSummary {
    fn from(group: &ProcessGroupEntity) -> Self {
        Self {
            id: group.id.clone(),
            name: group.component.name.clone(),
            running: group.running_count,
            stopped: group.stopped_count,
            invalid: group.invalid_count,
        }
    }
}

/// A flow and its processors
#[derive(Debug, Clone)]
pub struct FlowDetails {
    pub group: ProcessGroupEntity,
    pub processors: Vec<ProcessorEntity>,
}

/// Lookup and state control for flows under the root
#[derive(Clone)]
pub struct FlowManager {
    registry: NodeRegistry,
    lifecycle: LifecycleController,
}

impl FlowManager {
    pub fn new(registry: NodeRegistry) -> Self {
        Self {
            lifecycle: LifecycleController::new(registry.clone()),
            registry,
        }
    }

    pub async fn list_flows(&self) -> Result<Vec<FlowSummary>> {
        let groups = self.registry.list_scopes(ROOT_SCOPE).await?;
        Ok(groups.iter().map(FlowSummary::from).collect())
    }

    pub async fn show_flow(&self, name: &str) -> Result<FlowDetails> {
        let group = self.registry.find_scope_by_name(ROOT_SCOPE, name).await?;
        let processors = self.registry.list_nodes(&group.id).await?;
        Ok(FlowDetails { group, processors })
    }

    /// Start every processor of a flow, best effort
    pub async fn start_flow(&self, name: &str) -> Result<ActivationReport> {
        self.transition(name, ProcessorState::Running).await
    }

    /// Stop every processor of a flow, best effort
    pub async fn stop_flow(&self, name: &str) -> Result<ActivationReport> {
        self.transition(name, ProcessorState::Stopped).await
    }

    /// Engine status snapshot of a flow
    pub async fn flow_status(&self, name: &str) -> Result<Value> {
        let group = self.registry.find_scope_by_name(ROOT_SCOPE, name).await?;
        Ok(self.registry.client().flow_status(&group.id).await?)
    }

    /// Flow definition as the engine exports it
    pub async fn export_flow(&self, name: &str) -> Result<Value> {
        let group = self.registry.find_scope_by_name(ROOT_SCOPE, name).await?;
        Ok(self.registry.client().export_flow(&group.id).await?)
    }

    async fn transition(&self, name: &str, desired: ProcessorState) -> Result<ActivationReport> {
        let details = self.show_flow(name).await?;
        let nodes: Vec<(String, String)> = details
            .processors
            .iter()
            .map(|p| (p.display_name().to_string(), p.id.clone()))
            .collect();
        log::info!("Setting {} processor(s) in '{}' to {}", nodes.len(), name, desired);
        Ok(self.lifecycle.transition_all(&nodes, desired).await)
    }
}
