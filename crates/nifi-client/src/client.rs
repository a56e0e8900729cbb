//! Typed control-plane operations
//!
//! [`EngineClient`] turns resource-level calls into `request(method, path, body)`
//! round trips. It never caches revisions: callers pass the revision they just
//! read, and the engine decides whether it is still current.

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::{EngineError, Result};
use crate::transport::EngineTransport;
use crate::types::{
    ConnectionEntity, ProcessGroupEntity, ProcessGroupsEntity, ProcessorEntity, ProcessorsEntity,
    Revision,
};

/// Client for the engine's process-group, processor and connection resources
#[derive(Clone)]
pub struct EngineClient {
    transport: Arc<dyn EngineTransport>,
    /// Sent with every revision so the engine can attribute modifications
    client_id: String,
}

impl EngineClient {
    /// Create a client over a transport with a freshly generated client id
    pub fn new(transport: Arc<dyn EngineTransport>) -> Self {
        Self::with_client_id(transport, uuid::Uuid::new_v4().to_string())
    }

    /// Create a client with an explicit client id
    pub fn with_client_id(transport: Arc<dyn EngineTransport>, client_id: impl Into<String>) -> Self {
        Self {
            transport,
            client_id: client_id.into(),
        }
    }

    /// Client id attached to revisions
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Raw round trip for callers that need an endpoint not wrapped here
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        self.transport.request(method, path, body).await
    }

    async fn request_as<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let value = self.transport.request(method, path, body).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Revision echoed on a mutation: the version read, stamped with our client id
    fn stamp(&self, revision: &Revision) -> Revision {
        Revision {
            version: revision.version,
            client_id: Some(self.client_id.clone()),
        }
    }

    // ─── PROCESS GROUPS ─────────────────────────────────────────────

    /// `POST /process-groups/{parent}/process-groups`
    pub async fn create_process_group(&self, parent: &str, name: &str) -> Result<ProcessGroupEntity> {
        let body = json!({
            "revision": Revision::initial(&self.client_id),
            "component": {
                "name": name,
                "position": {"x": 0.0, "y": 0.0}
            }
        });
        self.request_as(
            Method::POST,
            &format!("/process-groups/{}/process-groups", parent),
            Some(body),
        )
        .await
    }

    /// `GET /process-groups/{id}`
    pub async fn get_process_group(&self, group_id: &str) -> Result<ProcessGroupEntity> {
        self.request_as(Method::GET, &format!("/process-groups/{}", group_id), None)
            .await
    }

    /// `GET /process-groups/{parent}/process-groups`
    pub async fn list_process_groups(&self, parent: &str) -> Result<Vec<ProcessGroupEntity>> {
        let listing: ProcessGroupsEntity = self
            .request_as(
                Method::GET,
                &format!("/process-groups/{}/process-groups", parent),
                None,
            )
            .await?;
        Ok(listing.process_groups)
    }

    /// Status of a process group.
    ///
    /// Uses `GET /process-groups/{id}/status`; if the engine rejects that
    /// endpoint, falls back to the plain group entity. Transport failures are
    /// not retried through the fallback.
    pub async fn flow_status(&self, group_id: &str) -> Result<Value> {
        match self
            .transport
            .request(Method::GET, &format!("/process-groups/{}/status", group_id), None)
            .await
        {
            Ok(status) => Ok(status),
            Err(EngineError::Rejected { status, .. }) => {
                log::debug!(
                    "Status endpoint unavailable for {} ({}), using group entity",
                    group_id,
                    status
                );
                self.transport
                    .request(Method::GET, &format!("/process-groups/{}", group_id), None)
                    .await
            }
            Err(e) => Err(e),
        }
    }

    /// `GET /process-groups/{id}/download` - flow definition as JSON
    pub async fn export_flow(&self, group_id: &str) -> Result<Value> {
        self.transport
            .request(Method::GET, &format!("/process-groups/{}/download", group_id), None)
            .await
    }

    // ─── PROCESSORS ─────────────────────────────────────────────────

    /// `POST /process-groups/{group}/processors`
    pub async fn create_processor(
        &self,
        group_id: &str,
        processor_type: &str,
        name: Option<&str>,
        config: &Value,
    ) -> Result<ProcessorEntity> {
        let mut component = json!({
            "type": processor_type,
            "position": {"x": 0.0, "y": 0.0},
            "config": config
        });
        if let Some(name) = name {
            component["name"] = json!(name);
        }
        let body = json!({
            "revision": Revision::initial(&self.client_id),
            "component": component
        });
        self.request_as(
            Method::POST,
            &format!("/process-groups/{}/processors", group_id),
            Some(body),
        )
        .await
    }

    /// `GET /processors/{id}`
    pub async fn get_processor(&self, processor_id: &str) -> Result<ProcessorEntity> {
        self.request_as(Method::GET, &format!("/processors/{}", processor_id), None)
            .await
    }

    /// `PUT /processors/{id}` with `{revision, component}`.
    ///
    /// `component` is sent as given, with `id` filled in.
    pub async fn update_processor(
        &self,
        processor_id: &str,
        revision: &Revision,
        mut component: Value,
    ) -> Result<ProcessorEntity> {
        if let Value::Object(map) = &mut component {
            map.insert("id".to_string(), json!(processor_id));
        }
        let body = json!({
            "revision": self.stamp(revision),
            "component": component
        });
        self.request_as(
            Method::PUT,
            &format!("/processors/{}", processor_id),
            Some(body),
        )
        .await
    }

    /// `DELETE /processors/{id}?version=N&clientId=...`
    pub async fn delete_processor(&self, processor_id: &str, revision: &Revision) -> Result<()> {
        self.transport
            .request(
                Method::DELETE,
                &format!(
                    "/processors/{}?version={}&clientId={}",
                    processor_id, revision.version, self.client_id
                ),
                None,
            )
            .await?;
        Ok(())
    }

    /// `GET /process-groups/{group}/processors`
    pub async fn list_processors(&self, group_id: &str) -> Result<Vec<ProcessorEntity>> {
        let listing: ProcessorsEntity = self
            .request_as(
                Method::GET,
                &format!("/process-groups/{}/processors", group_id),
                None,
            )
            .await?;
        Ok(listing.processors)
    }

    // ─── CONNECTIONS ────────────────────────────────────────────────

    /// `POST /process-groups/{group}/connections` from one processor to another
    pub async fn create_connection(
        &self,
        group_id: &str,
        source_id: &str,
        target_id: &str,
        relationships: &[String],
    ) -> Result<ConnectionEntity> {
        let body = json!({
            "revision": Revision::initial(&self.client_id),
            "component": {
                "source": {"id": source_id, "type": "PROCESSOR", "groupId": group_id},
                "destination": {"id": target_id, "type": "PROCESSOR", "groupId": group_id},
                "selectedRelationships": relationships
            }
        });
        self.request_as(
            Method::POST,
            &format!("/process-groups/{}/connections", group_id),
            Some(body),
        )
        .await
    }
}
