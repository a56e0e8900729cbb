//! Flow build plans
//!
//! A plan is the in-memory description of what one deployment call should
//! realize: node declarations plus either a linear chain over them or an
//! explicit edge list. It lives only for the duration of the call; once the
//! nodes exist remotely the engine is the system of record.

use nifi_client::{GroupId, ProcessorId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::selector::StageSelection;
use crate::templates::TemplateDocument;

/// A node to create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDeclaration {
    /// Role label ("source", "transform", ...) or template-local name
    pub name: String,
    /// Processor implementation known to the engine
    #[serde(rename = "type")]
    pub processor_type: String,
    /// Opaque configuration handed to the engine
    #[serde(default)]
    pub config: Value,
}

/// An edge between two declared nodes, by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDeclaration {
    pub source: String,
    pub target: String,
    /// Relationship to route; when absent the resolver picks one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
}

/// How declared nodes are connected
#[derive(Debug, Clone, PartialEq)]
pub enum Topology {
    /// Connect consecutive nodes in declaration order
    Chain,
    /// Connect exactly the listed edges
    Edges(Vec<EdgeDeclaration>),
}

/// Nodes and topology for one deployment
#[derive(Debug, Clone, PartialEq)]
pub struct FlowBuildPlan {
    pub nodes: Vec<NodeDeclaration>,
    pub topology: Topology,
}

impl FlowBuildPlan {
    /// Linear plan over stages picked from a description, in role order
    pub fn from_stages(stages: &[StageSelection]) -> Self {
        let nodes = stages
            .iter()
            .map(|stage| NodeDeclaration {
                name: stage.role.label().to_string(),
                processor_type: stage.archetype.processor_type().to_string(),
                config: stage.archetype.default_config(),
            })
            .collect();
        Self {
            nodes,
            topology: Topology::Chain,
        }
    }

    /// Edge-list plan from a template document
    pub fn from_template(template: &TemplateDocument) -> Self {
        let nodes = template
            .processors
            .iter()
            .map(|p| NodeDeclaration {
                name: p.name.clone(),
                processor_type: p.processor_type.clone(),
                config: if p.config.is_null() {
                    Value::Object(Default::default())
                } else {
                    p.config.clone()
                },
            })
            .collect();
        Self {
            nodes,
            topology: Topology::Edges(template.connections.clone()),
        }
    }

    /// Bind the plan to the identities the engine assigned.
    ///
    /// `nodes` holds one slot per declaration, in declaration order; `None`
    /// marks a node the engine did not create.
    pub fn realize(
        &self,
        scope: impl Into<GroupId>,
        nodes: Vec<(String, Option<ProcessorId>)>,
    ) -> RealizedPlan {
        RealizedPlan {
            scope: scope.into(),
            nodes,
            topology: self.topology.clone(),
        }
    }
}

/// A plan whose nodes exist in the engine
#[derive(Debug, Clone, PartialEq)]
pub struct RealizedPlan {
    pub scope: GroupId,
    /// (declared name, engine id) in declaration order; `None` where creation failed
    pub nodes: Vec<(String, Option<ProcessorId>)>,
    pub topology: Topology,
}

impl RealizedPlan {
    /// Engine id of a declared node, if it was created
    pub fn node_id(&self, name: &str) -> Option<&str> {
        self.nodes
            .iter()
            .filter(|(n, _)| n == name)
            .find_map(|(_, id)| id.as_deref())
    }

    /// Created nodes as (declared name, engine id), in declaration order
    pub fn created(&self) -> Vec<(String, ProcessorId)> {
        self.nodes
            .iter()
            .filter_map(|(name, id)| id.as_ref().map(|id| (name.clone(), id.clone())))
            .collect()
    }

    /// Engine ids of created nodes in declaration order
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().filter_map(|(_, id)| id.as_deref()).collect()
    }
}

/// Fluent builder for plans
///
/// # Example
///
/// ```ignore
/// let plan = PlanBuilder::new()
///     .add_node("ingest", "org.apache.nifi.processors.standard.GetFile")
///     .with_config(serde_json::json!({"properties": {"Input Directory": "/data"}}))
///     .add_node("log", "org.apache.nifi.processors.standard.LogAttribute")
///     .add_edge("ingest", "log")
///     .build();
/// ```
#[derive(Default)]
pub struct PlanBuilder {
    nodes: Vec<NodeDeclaration>,
    edges: Vec<EdgeDeclaration>,
    chain: bool,
}

impl PlanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with an empty configuration
    pub fn add_node(mut self, name: impl Into<String>, processor_type: impl Into<String>) -> Self {
        self.nodes.push(NodeDeclaration {
            name: name.into(),
            processor_type: processor_type.into(),
            config: Value::Object(Default::default()),
        });
        self
    }

    /// Set configuration on the most recently added node
    ///
    /// Must be called immediately after `add_node`.
    pub fn with_config(mut self, config: Value) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.config = config;
        }
        self
    }

    /// Add an edge whose relationship is resolved at wiring time
    pub fn add_edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edges.push(EdgeDeclaration {
            source: source.into(),
            target: target.into(),
            relationship: None,
        });
        self
    }

    /// Add an edge routing a specific relationship
    pub fn add_edge_via(
        mut self,
        source: impl Into<String>,
        relationship: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.edges.push(EdgeDeclaration {
            source: source.into(),
            target: target.into(),
            relationship: Some(relationship.into()),
        });
        self
    }

    /// Connect nodes linearly in declaration order instead of by edge list
    pub fn chained(mut self) -> Self {
        self.chain = true;
        self
    }

    pub fn build(self) -> FlowBuildPlan {
        let topology = if self.chain {
            Topology::Chain
        } else {
            Topology::Edges(self.edges)
        };
        FlowBuildPlan {
            nodes: self.nodes,
            topology,
        }
    }
}
