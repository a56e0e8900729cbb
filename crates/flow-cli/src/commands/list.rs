use anyhow::Result;
use flow_builder::{FlowManager, NodeRegistry};

/// Execute the `list` command: flows under the root with processor counts.
pub async fn execute(registry: &NodeRegistry) -> Result<()> {
    let flows = FlowManager::new(registry.clone()).list_flows().await?;

    if flows.is_empty() {
        println!("No flows found.");
        return Ok(());
    }

    for flow in &flows {
        println!(
            "  {}  ({})  running: {}  stopped: {}  invalid: {}",
            flow.name, flow.id, flow.running, flow.stopped, flow.invalid
        );
    }
    Ok(())
}
