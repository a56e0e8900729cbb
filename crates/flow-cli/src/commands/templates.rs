use std::path::Path;

use anyhow::Result;
use flow_builder::TemplateLibrary;

/// Execute the `templates` command: list templates in the templates directory.
pub fn execute(templates_dir: &Path) -> Result<()> {
    let library = TemplateLibrary::load_dir(templates_dir)?;

    if library.is_empty() {
        println!("No templates found in {}.", templates_dir.display());
        println!("Set NIFI_TEMPLATES_DIR or pass --templates-dir.");
        return Ok(());
    }

    for summary in library.list() {
        println!("  {}  ({} processors)", summary.name, summary.processor_count);
        println!("    {}", summary.description);
    }
    Ok(())
}
