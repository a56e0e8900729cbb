//! In-memory engine for tests
//!
//! Implements [`EngineTransport`] over a small model of the control plane:
//! process groups, processors with revisions and relationships, and
//! connections. Mutations with a stale revision are answered with 409, unknown
//! processor types with 400, and a PUT carrying `relationships` replaces the
//! whole set. Failures can be injected per processor.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nifi_client::{EngineClient, EngineError, EngineTransport, Method, Relationship};
use serde_json::{json, Value};

type EngineResult<T> = std::result::Result<T, EngineError>;

const STANDARD: &str = "org.apache.nifi.processors.standard.";

#[derive(Debug, Clone)]
struct MockGroup {
    id: String,
    name: String,
    parent: Option<String>,
    version: u64,
}

#[derive(Debug, Clone)]
struct MockProcessor {
    id: String,
    group: String,
    name: String,
    processor_type: String,
    state: String,
    config: Value,
    relationships: Vec<Relationship>,
    version: u64,
}

/// Connection as stored by the mock engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockConnection {
    pub id: String,
    pub group: String,
    pub source: String,
    pub target: String,
    pub relationships: Vec<String>,
}

#[derive(Default)]
struct EngineState {
    next_id: u64,
    groups: BTreeMap<String, MockGroup>,
    processors: BTreeMap<String, MockProcessor>,
    connections: Vec<MockConnection>,
    known_types: HashMap<String, Vec<String>>,
    fail_start: HashSet<String>,
    bump_after_read: HashSet<String>,
    reject_group_creation: bool,
    status_supported: bool,
    validate_on_start: bool,
    offline: bool,
    requests: Vec<(Method, String)>,
}

/// In-memory stand-in for the engine's REST surface
pub struct MockEngine {
    state: Mutex<EngineState>,
}

impl MockEngine {
    /// Engine with a root group and the standard processor types
    pub fn new() -> Arc<Self> {
        let mut state = EngineState {
            status_supported: true,
            ..EngineState::default()
        };
        state.groups.insert(
            "root".to_string(),
            MockGroup {
                id: "root".to_string(),
                name: "NiFi Flow".to_string(),
                parent: None,
                version: 0,
            },
        );
        for (short, rels) in [
            ("GenerateFlowFile", vec!["success"]),
            ("GetFile", vec!["success"]),
            ("ListenHTTP", vec!["success"]),
            ("ReplaceText", vec!["success", "failure"]),
            ("RouteOnAttribute", vec!["matched", "unmatched"]),
            ("LogAttribute", vec!["success"]),
            ("PutFile", vec!["success", "failure"]),
            ("PutDatabaseRecord", vec!["success", "failure", "retry"]),
        ] {
            state.known_types.insert(
                format!("{}{}", STANDARD, short),
                rels.into_iter().map(String::from).collect(),
            );
        }
        Arc::new(Self {
            state: Mutex::new(state),
        })
    }

    /// Client wired to this engine
    pub fn client(self: &Arc<Self>) -> EngineClient {
        EngineClient::with_client_id(self.clone(), "test-client")
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EngineState> {
        self.state.lock().unwrap()
    }

    // ─── SETUP / FAULT INJECTION ────────────────────────────────────

    /// Register an additional processor type with its relationship names
    pub fn register_type(&self, processor_type: &str, relationships: &[&str]) {
        self.lock().known_types.insert(
            processor_type.to_string(),
            relationships.iter().map(|r| r.to_string()).collect(),
        );
    }

    /// Reject any attempt to move this processor to RUNNING
    pub fn fail_start_of(&self, processor_id: &str) {
        self.lock().fail_start.insert(processor_id.to_string());
    }

    /// After the next read of this processor, bump its version as if another client edited it
    pub fn concurrent_edit_after_read(&self, processor_id: &str) {
        self.lock().bump_after_read.insert(processor_id.to_string());
    }

    /// Reject every process group creation
    pub fn reject_group_creation(&self) {
        self.lock().reject_group_creation = true;
    }

    /// Answer 404 on the `/status` endpoint
    pub fn disable_status_endpoint(&self) {
        self.lock().status_supported = false;
    }

    /// Refuse to start processors with relationships that are neither connected nor auto-terminated
    pub fn enable_start_validation(&self) {
        self.lock().validate_on_start = true;
    }

    /// Fail every request at the transport level
    pub fn go_offline(&self) {
        self.lock().offline = true;
    }

    /// Seed a processor with explicit relationships, bypassing the API
    pub fn seed_processor(&self, group: &str, processor_type: &str, relationships: Vec<Relationship>) -> String {
        let mut state = self.lock();
        let id = next_id(&mut state, "proc");
        state.processors.insert(
            id.clone(),
            MockProcessor {
                id: id.clone(),
                group: group.to_string(),
                name: short_name(processor_type),
                processor_type: processor_type.to_string(),
                state: "STOPPED".to_string(),
                config: json!({}),
                relationships,
                version: 1,
            },
        );
        id
    }

    /// Seed a process group, bypassing the API
    pub fn seed_group(&self, parent: &str, name: &str) -> String {
        let mut state = self.lock();
        let id = next_id(&mut state, "group");
        state.groups.insert(
            id.clone(),
            MockGroup {
                id: id.clone(),
                name: name.to_string(),
                parent: Some(parent.to_string()),
                version: 1,
            },
        );
        id
    }

    // ─── INSPECTION ─────────────────────────────────────────────────

    /// Connections in creation order
    pub fn connections(&self) -> Vec<MockConnection> {
        self.lock().connections.clone()
    }

    /// Every request seen, in order
    pub fn requests(&self) -> Vec<(Method, String)> {
        self.lock().requests.clone()
    }

    /// Number of requests with this method whose path starts with `prefix`
    pub fn count_requests(&self, method: Method, prefix: &str) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|(m, p)| *m == method && p.starts_with(prefix))
            .count()
    }

    /// Current state string of a processor
    pub fn processor_state(&self, processor_id: &str) -> Option<String> {
        self.lock().processors.get(processor_id).map(|p| p.state.clone())
    }

    /// Current version of a processor
    pub fn processor_version(&self, processor_id: &str) -> Option<u64> {
        self.lock().processors.get(processor_id).map(|p| p.version)
    }

    /// Processor ids in a group, in id order.
    ///
    /// Ids are zero-padded sequence numbers, so id order is creation order.
    pub fn processors_in(&self, group: &str) -> Vec<String> {
        self.lock()
            .processors
            .values()
            .filter(|p| p.group == group)
            .map(|p| p.id.clone())
            .collect()
    }

    /// Process groups with this name
    pub fn groups_named(&self, name: &str) -> Vec<String> {
        self.lock()
            .groups
            .values()
            .filter(|g| g.name == name)
            .map(|g| g.id.clone())
            .collect()
    }

    // ─── REQUEST HANDLING ───────────────────────────────────────────

    fn handle(&self, method: Method, path: &str, body: Option<Value>) -> EngineResult<Value> {
        let mut state = self.lock();
        state.requests.push((method.clone(), path.to_string()));
        if state.offline {
            return Err(EngineError::transport("connection refused"));
        }

        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p, parse_query(q)),
            None => (path, HashMap::new()),
        };
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        let body = body.unwrap_or(Value::Null);

        match (method.as_str(), segments.as_slice()) {
            ("POST", ["process-groups", parent, "process-groups"]) => {
                create_group(&mut state, parent, &body)
            }
            ("GET", ["process-groups", parent, "process-groups"]) => {
                let groups: Vec<Value> = state
                    .groups
                    .values()
                    .filter(|g| g.parent.as_deref() == Some(*parent))
                    .map(|g| group_json(&state, g))
                    .collect();
                Ok(json!({ "processGroups": groups }))
            }
            ("GET", ["process-groups", id]) => {
                let group = find_group(&state, id)?;
                Ok(group_json(&state, group))
            }
            ("GET", ["process-groups", id, "status"]) => {
                if !state.status_supported {
                    return Err(EngineError::rejected(404, "Not Found"));
                }
                let group = find_group(&state, id)?;
                let entity = group_json(&state, group);
                Ok(json!({
                    "processGroupStatus": {
                        "id": group.id,
                        "name": group.name,
                        "runningCount": entity["runningCount"],
                        "stoppedCount": entity["stoppedCount"]
                    }
                }))
            }
            ("GET", ["process-groups", id, "download"]) => {
                let group = find_group(&state, id)?;
                let processors: Vec<Value> = state
                    .processors
                    .values()
                    .filter(|p| p.group == group.id)
                    .map(|p| json!({"identifier": p.id, "name": p.name, "type": p.processor_type}))
                    .collect();
                let connections: Vec<Value> = state
                    .connections
                    .iter()
                    .filter(|c| c.group == group.id)
                    .map(|c| json!({"source": c.source, "destination": c.target}))
                    .collect();
                Ok(json!({
                    "flowContents": {
                        "name": group.name,
                        "processors": processors,
                        "connections": connections
                    }
                }))
            }
            ("POST", ["process-groups", group, "processors"]) => {
                create_processor(&mut state, group, &body)
            }
            ("GET", ["process-groups", group, "processors"]) => {
                find_group(&state, group)?;
                let processors: Vec<Value> = state
                    .processors
                    .values()
                    .filter(|p| p.group == *group)
                    .map(processor_json)
                    .collect();
                Ok(json!({ "processors": processors }))
            }
            ("POST", ["process-groups", group, "connections"]) => {
                create_connection(&mut state, group, &body)
            }
            ("GET", ["processors", id]) => {
                let entity = processor_json(find_processor(&state, id)?);
                if state.bump_after_read.remove(*id) {
                    if let Some(p) = state.processors.get_mut(*id) {
                        p.version += 1;
                    }
                }
                Ok(entity)
            }
            ("PUT", ["processors", id]) => update_processor(&mut state, id, &body),
            ("DELETE", ["processors", id]) => {
                let current = find_processor(&state, id)?.version;
                let version = query
                    .get("version")
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(u64::MAX);
                if version != current {
                    return Err(stale(id, version, current));
                }
                let removed = state.processors.remove(*id);
                Ok(removed.as_ref().map(processor_json).unwrap_or(Value::Null))
            }
            _ => Err(EngineError::rejected(
                404,
                format!("No handler for {} {}", method, path),
            )),
        }
    }
}

#[async_trait]
impl EngineTransport for MockEngine {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> EngineResult<Value> {
        self.handle(method, path, body)
    }
}

fn next_id(state: &mut EngineState, prefix: &str) -> String {
    state.next_id += 1;
    format!("{}-{:04}", prefix, state.next_id)
}

fn short_name(processor_type: &str) -> String {
    processor_type
        .rsplit('.')
        .next()
        .unwrap_or(processor_type)
        .to_string()
}

fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn stale(id: &str, sent: u64, current: u64) -> EngineError {
    EngineError::rejected(
        409,
        format!(
            "Error: [{}, {}] is not the most up-to-date revision. This component appears to have been modified (current version {})",
            sent, id, current
        ),
    )
}

fn find_group<'a>(state: &'a EngineState, id: &str) -> EngineResult<&'a MockGroup> {
    state
        .groups
        .get(id)
        .ok_or_else(|| EngineError::rejected(404, format!("Unable to find process group with id '{}'.", id)))
}

fn find_processor<'a>(state: &'a EngineState, id: &str) -> EngineResult<&'a MockProcessor> {
    state
        .processors
        .get(id)
        .ok_or_else(|| EngineError::rejected(404, format!("Unable to find processor with id '{}'.", id)))
}

fn group_json(state: &EngineState, group: &MockGroup) -> Value {
    let count = |s: &str| {
        state
            .processors
            .values()
            .filter(|p| p.group == group.id && p.state == s)
            .count()
    };
    json!({
        "id": group.id,
        "revision": {"version": group.version},
        "component": {"id": group.id, "name": group.name, "parentGroupId": group.parent},
        "runningCount": count("RUNNING"),
        "stoppedCount": count("STOPPED"),
        "disabledCount": count("DISABLED"),
        "invalidCount": 0
    })
}

fn processor_json(p: &MockProcessor) -> Value {
    json!({
        "id": p.id,
        "revision": {"version": p.version},
        "component": {
            "id": p.id,
            "name": p.name,
            "type": p.processor_type,
            "state": p.state,
            "config": p.config,
            "relationships": p.relationships,
            "parentGroupId": p.group
        }
    })
}

fn create_group(state: &mut EngineState, parent: &str, body: &Value) -> EngineResult<Value> {
    find_group(state, parent)?;
    if state.reject_group_creation {
        return Err(EngineError::rejected(403, "Unable to create process group: access denied"));
    }
    let name = body["component"]["name"].as_str().unwrap_or("").to_string();
    let id = next_id(state, "group");
    let group = MockGroup {
        id: id.clone(),
        name,
        parent: Some(parent.to_string()),
        version: 1,
    };
    let entity = group_json(state, &group);
    state.groups.insert(id, group);
    Ok(entity)
}

fn create_processor(state: &mut EngineState, group: &str, body: &Value) -> EngineResult<Value> {
    find_group(state, group)?;
    let component = &body["component"];
    let processor_type = component["type"].as_str().unwrap_or("").to_string();
    let rel_names = state.known_types.get(&processor_type).cloned().ok_or_else(|| {
        EngineError::rejected(
            400,
            format!("Unable to create processor: unknown type {}", processor_type),
        )
    })?;

    let config = component.get("config").cloned().unwrap_or_else(|| json!({}));
    let auto_terminated: HashSet<String> = config["autoTerminatedRelationships"]
        .as_array()
        .map(|names| {
            names
                .iter()
                .filter_map(|n| n.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();
    let relationships = rel_names
        .into_iter()
        .map(|name| {
            let terminated = auto_terminated.contains(&name);
            Relationship::new(name, terminated)
        })
        .collect();

    let id = next_id(state, "proc");
    let processor = MockProcessor {
        id: id.clone(),
        group: group.to_string(),
        name: component["name"]
            .as_str()
            .map(String::from)
            .unwrap_or_else(|| short_name(&processor_type)),
        processor_type,
        state: "STOPPED".to_string(),
        config,
        relationships,
        version: 1,
    };
    let entity = processor_json(&processor);
    state.processors.insert(id, processor);
    Ok(entity)
}

fn create_connection(state: &mut EngineState, group: &str, body: &Value) -> EngineResult<Value> {
    find_group(state, group)?;
    let component = &body["component"];
    let source = component["source"]["id"].as_str().unwrap_or("").to_string();
    let target = component["destination"]["id"].as_str().unwrap_or("").to_string();
    let selected: Vec<String> = component["selectedRelationships"]
        .as_array()
        .map(|rels| rels.iter().filter_map(|r| r.as_str().map(String::from)).collect())
        .unwrap_or_default();

    let source_proc = find_processor(state, &source)?;
    find_processor(state, &target)?;
    if selected.is_empty() {
        return Err(EngineError::rejected(400, "Connection must select at least one relationship"));
    }
    for rel in &selected {
        if !source_proc.relationships.iter().any(|r| &r.name == rel) {
            return Err(EngineError::rejected(
                400,
                format!("Relationship '{}' is not valid for {}", rel, source),
            ));
        }
    }

    let id = next_id(state, "conn");
    state.connections.push(MockConnection {
        id: id.clone(),
        group: group.to_string(),
        source,
        target,
        relationships: selected,
    });
    Ok(json!({"id": id, "revision": {"version": 1}}))
}

fn update_processor(state: &mut EngineState, id: &str, body: &Value) -> EngineResult<Value> {
    let current = find_processor(state, id)?.version;
    let sent = body["revision"]["version"].as_u64().unwrap_or(u64::MAX);
    if sent != current {
        return Err(stale(id, sent, current));
    }

    let component = &body["component"];
    if let Some(target_state) = component["state"].as_str() {
        if target_state == "RUNNING" {
            if state.fail_start.contains(id) {
                return Err(EngineError::rejected(
                    409,
                    format!("{} is not in a valid state to be started", id),
                ));
            }
            if state.validate_on_start {
                let processor = find_processor(state, id)?;
                let unrouted: Vec<&str> = processor
                    .relationships
                    .iter()
                    .filter(|r| {
                        !r.auto_terminate
                            && !state
                                .connections
                                .iter()
                                .any(|c| c.source == id && c.relationships.contains(&r.name))
                    })
                    .map(|r| r.name.as_str())
                    .collect();
                if !unrouted.is_empty() {
                    return Err(EngineError::rejected(
                        409,
                        format!(
                            "'Relationship {}' is invalid because Relationship is not connected to any component and is not auto-terminated",
                            unrouted.join(", ")
                        ),
                    ));
                }
            }
        }
    }

    let processor = state
        .processors
        .get_mut(id)
        .ok_or_else(|| EngineError::rejected(404, "gone"))?;
    if let Some(target_state) = component["state"].as_str() {
        processor.state = target_state.to_string();
    }
    if let Some(config) = component.get("config") {
        if !config.is_null() {
            processor.config = config.clone();
        }
    }
    if let Some(rels) = component.get("relationships") {
        processor.relationships = serde_json::from_value(rels.clone())
            .map_err(|e| EngineError::rejected(400, e.to_string()))?;
    }
    if let Some(name) = component["name"].as_str() {
        processor.name = name.to_string();
    }
    processor.version += 1;
    Ok(processor_json(processor))
}
