use anyhow::Result;
use flow_builder::{FlowDeployer, NodeRegistry};

/// Execute the `deploy` command: build and start a flow from a description.
pub async fn execute(registry: &NodeRegistry, name: &str, description: &str) -> Result<()> {
    let report = FlowDeployer::new(registry.clone())
        .deploy_description(name, description)
        .await?;
    println!("{}", report);
    Ok(())
}
