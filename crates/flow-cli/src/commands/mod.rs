pub mod deploy;
pub mod export;
pub mod list;
pub mod show;
pub mod start;
pub mod status;
pub mod stop;
pub mod template;
pub mod templates;

use flow_builder::ActivationReport;

/// Print a start/stop pass and fail if any processor did not transition
pub(crate) fn report_transition(
    verb: &str,
    flow: &str,
    report: &ActivationReport,
) -> anyhow::Result<()> {
    let total = report.started.len() + report.failed.len();
    println!("{} {} of {} processor(s) in '{}'", verb, report.started.len(), total, flow);
    for failure in &report.failed {
        println!("  failed: {} ({}): {}", failure.role, failure.node_id, failure.error);
    }
    if !report.all_succeeded() {
        anyhow::bail!("{} processor(s) in '{}' did not transition", report.failed.len(), flow);
    }
    Ok(())
}
