use anyhow::Result;
use flow_builder::{FlowManager, NodeRegistry};

/// Execute the `stop` command.
pub async fn execute(registry: &NodeRegistry, flow: &str) -> Result<()> {
    let report = FlowManager::new(registry.clone()).stop_flow(flow).await?;
    super::report_transition("Stopped", flow, &report)
}
