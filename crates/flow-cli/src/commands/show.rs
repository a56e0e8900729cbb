use anyhow::Result;
use flow_builder::{FlowManager, NodeRegistry};

/// Execute the `show` command: a flow's processors and their states.
pub async fn execute(registry: &NodeRegistry, flow: &str) -> Result<()> {
    let details = FlowManager::new(registry.clone()).show_flow(flow).await?;

    println!("Flow: {} ({})", details.group.component.name, details.group.id);
    if details.processors.is_empty() {
        println!("  No processors.");
        return Ok(());
    }
    for processor in &details.processors {
        println!(
            "  {}  [{}]  {}",
            processor.display_name(),
            processor.component.state,
            processor.id
        );
        let terminated: Vec<&str> = processor
            .component
            .relationships
            .iter()
            .filter(|r| r.auto_terminate)
            .map(|r| r.name.as_str())
            .collect();
        if !terminated.is_empty() {
            println!("    auto-terminated: {}", terminated.join(", "));
        }
    }
    Ok(())
}
