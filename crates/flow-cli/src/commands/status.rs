use anyhow::Result;
use flow_builder::{FlowManager, NodeRegistry};

/// Execute the `status` command: the engine's status snapshot as JSON.
pub async fn execute(registry: &NodeRegistry, flow: &str) -> Result<()> {
    let status = FlowManager::new(registry.clone()).flow_status(flow).await?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
