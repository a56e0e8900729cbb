use std::path::Path;

use anyhow::{Context, Result};
use flow_builder::{FlowManager, NodeRegistry};
use serde_json::Value;

/// Execute the `export` command: flow definition to a file or stdout.
pub async fn execute(registry: &NodeRegistry, flow: &str, output: Option<&Path>) -> Result<()> {
    let definition = FlowManager::new(registry.clone()).export_flow(flow).await?;
    write_json(&definition, output)?;
    if let Some(path) = output {
        println!("Exported '{}' to {}", flow, path.display());
    }
    Ok(())
}

fn write_json(value: &Value, output: Option<&Path>) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => std::fs::write(path, text + "\n")
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}
