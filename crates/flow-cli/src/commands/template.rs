use std::path::Path;

use anyhow::Result;
use flow_builder::{FlowDeployer, NodeRegistry, TemplateLibrary};

/// Execute the `template` command: deploy a named template as a new flow.
pub async fn execute(
    registry: &NodeRegistry,
    templates_dir: &Path,
    template: &str,
    flow: &str,
) -> Result<()> {
    let library = TemplateLibrary::load_dir(templates_dir)?;
    let report = FlowDeployer::new(registry.clone())
        .deploy_template(&library, template, flow)
        .await?;
    println!("{}", report);
    Ok(())
}
