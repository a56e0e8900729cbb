//! Deployment driver
//!
//! One deployment creates a process group under the root, creates the
//! plan's processors inside it, wires them, then runs a best-effort start
//! pass. Only the process group creation is fatal; every later step reports
//! its failures as warnings and the deployment carries on with what exists.

use std::fmt;

use nifi_client::{GroupId, ProcessorId};

use crate::error::{FlowError, Result};
use crate::lifecycle::{ActivationReport, LifecycleController};
use crate::plan::FlowBuildPlan;
use crate::registry::{NodeRegistry, ROOT_SCOPE};
use crate::selector::select_stages;
use crate::templates::TemplateLibrary;
use crate::wiring::{GraphWiring, WiringReport};

/// A declared node the engine refused to create
#[derive(Debug)]
pub struct NodeFailure {
    pub name: String,
    pub processor_type: String,
    pub error: FlowError,
}

/// Everything one deployment did
#[derive(Debug)]
pub struct DeploymentReport {
    pub flow_name: String,
    pub scope: GroupId,
    /// (declared name, processor id) for nodes that exist
    pub nodes: Vec<(String, ProcessorId)>,
    pub node_failures: Vec<NodeFailure>,
    pub wiring: WiringReport,
    pub activation: ActivationReport,
}

impl DeploymentReport {
    /// True when every declared node, edge and start succeeded
    pub fn is_clean(&self) -> bool {
        self.node_failures.is_empty() && self.wiring.is_complete() && self.activation.all_succeeded()
    }

    /// Warning lines for everything that went wrong
    pub fn warnings(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for f in &self.node_failures {
            lines.push(format!("node '{}' ({}) not created: {}", f.name, f.processor_type, f.error));
        }
        for edge in &self.wiring.skipped {
            lines.push(format!(
                "connection {} -> {} skipped: node not created",
                edge.source, edge.target
            ));
        }
        for f in &self.wiring.failures {
            lines.push(format!("connection {} -> {} failed: {}", f.source, f.target, f.error));
        }
        for f in &self.activation.failed {
            lines.push(format!("'{}' ({}) did not start: {}", f.role, f.node_id, f.error));
        }
        lines
    }
}

impl fmt::Display for DeploymentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Deployed flow '{}' ({})", self.flow_name, self.scope)?;
        writeln!(
            f,
            "  processors:  {} created, {} failed",
            self.nodes.len(),
            self.node_failures.len()
        )?;
        writeln!(
            f,
            "  connections: {} created, {} skipped, {} failed",
            self.wiring.connections.len(),
            self.wiring.skipped.len(),
            self.wiring.failures.len()
        )?;
        write!(
            f,
            "  started:     {} of {}",
            self.activation.started.len(),
            self.nodes.len()
        )?;
        for line in self.warnings() {
            write!(f, "\n  warning: {}", line)?;
        }
        Ok(())
    }
}

/// Builds and starts flows from descriptions, templates or explicit plans
#[derive(Clone)]
pub struct FlowDeployer {
    registry: NodeRegistry,
    wiring: GraphWiring,
    lifecycle: LifecycleController,
}

impl FlowDeployer {
    pub fn new(registry: NodeRegistry) -> Self {
        Self {
            wiring: GraphWiring::new(registry.clone()),
            lifecycle: LifecycleController::new(registry.clone()),
            registry,
        }
    }

    /// Deploy a linear flow picked from a free-text description
    pub async fn deploy_description(&self, name: &str, description: &str) -> Result<DeploymentReport> {
        let stages = select_stages(description);
        log::info!(
            "Selected stages for '{}': {}",
            name,
            stages
                .iter()
                .map(|s| format!("{}={}", s.role.label(), s.archetype.label()))
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.deploy_plan(name, &FlowBuildPlan::from_stages(&stages)).await
    }

    /// Deploy a named template from `library` as a new flow
    pub async fn deploy_template(
        &self,
        library: &TemplateLibrary,
        template: &str,
        flow_name: &str,
    ) -> Result<DeploymentReport> {
        let document = library.get(template)?;
        log::info!("Deploying template '{}' as '{}'", template, flow_name);
        self.deploy_plan(flow_name, &FlowBuildPlan::from_template(document))
            .await
    }

    /// Realize a plan in a new process group under the root
    pub async fn deploy_plan(&self, name: &str, plan: &FlowBuildPlan) -> Result<DeploymentReport> {
        let scope = self.registry.create_scope(name, ROOT_SCOPE).await?;

        let mut nodes = Vec::with_capacity(plan.nodes.len());
        let mut node_failures = Vec::new();
        for declared in &plan.nodes {
            match self
                .registry
                .create_named_node(&scope, &declared.processor_type, Some(declared.name.as_str()), &declared.config)
                .await
            {
                Ok(entity) => nodes.push((declared.name.clone(), Some(entity.id))),
                Err(error) => {
                    log::warn!(
                        "Failed to create processor '{}' ({}): {}",
                        declared.name,
                        declared.processor_type,
                        error
                    );
                    node_failures.push(NodeFailure {
                        name: declared.name.clone(),
                        processor_type: declared.processor_type.clone(),
                        error,
                    });
                    nodes.push((declared.name.clone(), None));
                }
            }
        }

        let realized = plan.realize(scope.clone(), nodes);
        let wiring = self.wiring.wire_plan(&realized).await;
        let created = realized.created();
        let activation = self.lifecycle.start_all(&created).await;

        let report = DeploymentReport {
            flow_name: name.to_string(),
            scope,
            nodes: created,
            node_failures,
            wiring,
            activation,
        };
        if report.is_clean() {
            log::info!("Deployed flow '{}' ({})", name, report.scope);
        } else {
            log::warn!(
                "Deployed flow '{}' ({}) with {} warning(s)",
                name,
                report.scope,
                report.warnings().len()
            );
        }
        Ok(report)
    }
}
