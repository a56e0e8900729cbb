//! Wire model of the control-plane API
//!
//! Only the fields the flow builder reads are typed; everything else in a
//! component is carried through `config` as opaque JSON so it survives a
//! read-modify-write cycle untouched.

use serde::{Deserialize, Serialize};

/// Unique identifier for a processor
pub type ProcessorId = String;

/// Unique identifier for a process group
pub type GroupId = String;

/// Unique identifier for a connection
pub type ConnectionId = String;

/// Engine-owned optimistic-concurrency token
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    /// Monotonically increasing version; mutations must echo the last one read
    #[serde(default)]
    pub version: u64,
    /// Client that performed the last modification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl Revision {
    /// Revision used when creating a new component
    pub fn initial(client_id: impl Into<String>) -> Self {
        Self {
            version: 0,
            client_id: Some(client_id.into()),
        }
    }
}

/// Scheduled state of a processor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessorState {
    #[default]
    Stopped,
    Running,
    Disabled,
}

impl ProcessorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessorState::Stopped => "STOPPED",
            ProcessorState::Running => "RUNNING",
            ProcessorState::Disabled => "DISABLED",
        }
    }
}

impl std::fmt::Display for ProcessorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named output channel of a processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub name: String,
    #[serde(default)]
    pub auto_terminate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Relationship {
    pub fn new(name: impl Into<String>, auto_terminate: bool) -> Self {
        Self {
            name: name.into(),
            auto_terminate,
            description: None,
        }
    }
}

/// Processor component as returned inside a [`ProcessorEntity`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorComponent {
    pub id: ProcessorId,
    #[serde(default)]
    pub name: String,
    /// Fully-qualified processor implementation, e.g. `org.apache.nifi.processors.standard.LogAttribute`
    #[serde(rename = "type")]
    pub processor_type: String,
    #[serde(default)]
    pub state: ProcessorState,
    /// Properties, scheduling period and any other engine-defined settings
    #[serde(default)]
    pub config: serde_json::Value,
    /// Relationships in the processor's declared order
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_group_id: Option<GroupId>,
}

/// `{revision, component}` envelope for a processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorEntity {
    pub id: ProcessorId,
    #[serde(default)]
    pub revision: Revision,
    pub component: ProcessorComponent,
}

impl ProcessorEntity {
    /// Display name, falling back to the short type name
    pub fn display_name(&self) -> &str {
        if self.component.name.is_empty() {
            self.component
                .processor_type
                .rsplit('.')
                .next()
                .unwrap_or(&self.component.processor_type)
        } else {
            &self.component.name
        }
    }
}

/// Process group component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroupComponent {
    pub id: GroupId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_group_id: Option<GroupId>,
}

/// `{revision, component}` envelope for a process group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroupEntity {
    pub id: GroupId,
    #[serde(default)]
    pub revision: Revision,
    pub component: ProcessGroupComponent,
    #[serde(default)]
    pub running_count: u32,
    #[serde(default)]
    pub stopped_count: u32,
    #[serde(default)]
    pub disabled_count: u32,
    #[serde(default)]
    pub invalid_count: u32,
    /// Aggregate status snapshot, shape defined by the engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<serde_json::Value>,
}

/// Connection envelope; only the identity is needed by the builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionEntity {
    pub id: ConnectionId,
    #[serde(default)]
    pub revision: Revision,
}

/// `GET /process-groups/{id}/processors` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorsEntity {
    #[serde(default)]
    pub processors: Vec<ProcessorEntity>,
}

/// `GET /process-groups/{id}/process-groups` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroupsEntity {
    #[serde(default)]
    pub process_groups: Vec<ProcessGroupEntity>,
}
