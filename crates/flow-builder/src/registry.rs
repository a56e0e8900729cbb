//! Node registry: processors and process groups inside the engine
//!
//! Every mutating call re-reads the target first and submits the revision it
//! just observed. Revisions are never cached between calls, and a rejected
//! mutation is surfaced as-is: the engine is the only arbiter of concurrent
//! edits.

use nifi_client::{
    EngineClient, GroupId, ProcessGroupEntity, ProcessorEntity, ProcessorId, ProcessorState,
};
use serde_json::{json, Value};

use crate::error::{FlowError, Result};
use crate::relationships::{auto_terminated_names, merge_auto_terminate};

/// Identifier of the top-level scope
pub const ROOT_SCOPE: &str = nifi_client::constants::defaults::ROOT_GROUP;

/// Processor and process-group operations with read-before-write revisioning
#[derive(Clone)]
pub struct NodeRegistry {
    client: EngineClient,
}

impl NodeRegistry {
    pub fn new(client: EngineClient) -> Self {
        Self { client }
    }

    /// Underlying engine client
    pub fn client(&self) -> &EngineClient {
        &self.client
    }

    // ─── SCOPES ─────────────────────────────────────────────────────

    /// Create an empty scope under `parent`
    pub async fn create_scope(&self, name: &str, parent: &str) -> Result<GroupId> {
        let group = self.client.create_process_group(parent, name).await?;
        log::info!("Created process group '{}' ({}) under {}", name, group.id, parent);
        Ok(group.id)
    }

    pub async fn read_scope(&self, scope: &str) -> Result<ProcessGroupEntity> {
        Ok(self.client.get_process_group(scope).await?)
    }

    /// Direct child scopes of `parent`
    pub async fn list_scopes(&self, parent: &str) -> Result<Vec<ProcessGroupEntity>> {
        Ok(self.client.list_process_groups(parent).await?)
    }

    /// First child scope of `parent` with exactly this name
    pub async fn find_scope_by_name(&self, parent: &str, name: &str) -> Result<ProcessGroupEntity> {
        self.list_scopes(parent)
            .await?
            .into_iter()
            .find(|g| g.component.name == name)
            .ok_or_else(|| FlowError::FlowNotFound(name.to_string()))
    }

    // ─── NODES ──────────────────────────────────────────────────────

    /// Create a processor of `processor_type` in `scope`; `config` is passed through untouched
    pub async fn create_node(
        &self,
        scope: &str,
        processor_type: &str,
        config: &Value,
    ) -> Result<ProcessorId> {
        Ok(self.create_named_node(scope, processor_type, None, config).await?.id)
    }

    /// Create a processor with an explicit display name
    pub async fn create_named_node(
        &self,
        scope: &str,
        processor_type: &str,
        name: Option<&str>,
        config: &Value,
    ) -> Result<ProcessorEntity> {
        let entity = self
            .client
            .create_processor(scope, processor_type, name, config)
            .await?;
        log::info!(
            "Created processor {} ({}) in {}",
            entity.display_name(),
            entity.id,
            scope
        );
        Ok(entity)
    }

    /// Current state of a processor, including its revision
    pub async fn read_node(&self, node_id: &str) -> Result<ProcessorEntity> {
        Ok(self.client.get_processor(node_id).await?)
    }

    /// Processors in a scope
    pub async fn list_nodes(&self, scope: &str) -> Result<Vec<ProcessorEntity>> {
        Ok(self.client.list_processors(scope).await?)
    }

    /// Move a processor to `desired` state.
    ///
    /// Requesting the state the node is already in is accepted by the engine
    /// as a no-op transition.
    pub async fn set_state(&self, node_id: &str, desired: ProcessorState) -> Result<ProcessorEntity> {
        let current = self.read_node(node_id).await?;
        let updated = self
            .client
            .update_processor(node_id, &current.revision, json!({ "state": desired }))
            .await?;
        log::debug!(
            "Processor {} {} -> {} (revision {})",
            node_id,
            current.component.state,
            updated.component.state,
            updated.revision.version
        );
        Ok(updated)
    }

    /// Replace a processor's configuration
    pub async fn update_config(&self, node_id: &str, config: &Value) -> Result<ProcessorEntity> {
        let current = self.read_node(node_id).await?;
        Ok(self
            .client
            .update_processor(node_id, &current.revision, json!({ "config": config }))
            .await?)
    }

    /// Auto-terminate the named relationships, leaving all others as they are.
    ///
    /// Submits the complete merged set (the engine replaces rather than
    /// patches) and mirrors the terminated names into
    /// `config.autoTerminatedRelationships`.
    pub async fn auto_terminate(&self, node_id: &str, names: &[&str]) -> Result<ProcessorEntity> {
        let current = self.read_node(node_id).await?;
        let merged = merge_auto_terminate(&current.component.relationships, names);

        let mut config = match current.component.config.clone() {
            Value::Object(map) => Value::Object(map),
            _ => json!({}),
        };
        config["autoTerminatedRelationships"] = json!(auto_terminated_names(&merged));

        Ok(self
            .client
            .update_processor(
                node_id,
                &current.revision,
                json!({ "config": config, "relationships": merged }),
            )
            .await?)
    }

    /// Delete a processor
    pub async fn delete_node(&self, node_id: &str) -> Result<()> {
        let current = self.read_node(node_id).await?;
        self.client.delete_processor(node_id, &current.revision).await?;
        log::info!("Deleted processor {}", node_id);
        Ok(())
    }
}
