use anyhow::Result;
use flow_builder::{FlowManager, NodeRegistry};

/// Execute the `start` command.
pub async fn execute(registry: &NodeRegistry, flow: &str) -> Result<()> {
    let report = FlowManager::new(registry.clone()).start_flow(flow).await?;
    super::report_transition("Started", flow, &report)
}
