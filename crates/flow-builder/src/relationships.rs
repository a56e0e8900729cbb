//! Relationship resolution and auto-termination merging
//!
//! A relationship that is neither connected nor auto-terminated makes the
//! engine hold output forever, so every wiring decision goes through here:
//! [`available_outputs`] lists what can still be routed, [`select_output`]
//! picks the one used for a single successor, and [`merge_auto_terminate`]
//! produces the full replacement set the engine expects on update.

use std::collections::HashSet;

use nifi_client::{ProcessorEntity, Relationship};

use crate::error::{FlowError, Result};

/// Names of the node's relationships that are not auto-terminated, in declared order
pub fn available_outputs(node: &ProcessorEntity) -> Vec<String> {
    node.component
        .relationships
        .iter()
        .filter(|r| !r.auto_terminate)
        .map(|r| r.name.clone())
        .collect()
}

/// Relationship to use when wiring `node` to a single successor.
///
/// Picks the first relationship in declared order that is not
/// auto-terminated. Nodes with several meaningful outputs (routers) still
/// get exactly one; fan-out needs an explicit relationship per edge.
pub fn select_output(node: &ProcessorEntity) -> Result<String> {
    node.component
        .relationships
        .iter()
        .find(|r| !r.auto_terminate)
        .map(|r| r.name.clone())
        .ok_or_else(|| FlowError::NoAvailableRelationship {
            node_id: node.id.clone(),
        })
}

/// Full relationship set with every relationship named in `names` auto-terminated.
///
/// Relationships not named keep their current flag; order is preserved. The
/// engine replaces the whole set on update, so the result must always be
/// submitted in full.
pub fn merge_auto_terminate(current: &[Relationship], names: &[&str]) -> Vec<Relationship> {
    let names: HashSet<&str> = names.iter().copied().collect();
    current
        .iter()
        .map(|r| {
            let mut merged = r.clone();
            if names.contains(r.name.as_str()) {
                merged.auto_terminate = true;
            }
            merged
        })
        .collect()
}

/// Names of the auto-terminated relationships in a set, in declared order
pub fn auto_terminated_names(relationships: &[Relationship]) -> Vec<String> {
    relationships
        .iter()
        .filter(|r| r.auto_terminate)
        .map(|r| r.name.clone())
        .collect()
}
