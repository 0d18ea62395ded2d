//! Workflow definition parsing and structural validation.
//!
//! Validation happens when a definition is created or updated, never at
//! execution time. The engine may assume any workflow it receives has
//! already passed `validate_workflow`.

use std::collections::HashSet;

use toolflow_types::error::{EngineError, ErrorCode};
use toolflow_types::workflow::{Mapping, Workflow};

/// Parse a workflow from JSON text.
///
/// Serde failures map to `WORKFLOW_INVALID`, except that an unknown mapping
/// `type` tag is surfaced as `MAPPING_INVALID` so callers can tell a
/// malformed mapping from a malformed workflow.
pub fn parse_workflow_json(json: &str) -> Result<Workflow, EngineError> {
    serde_json::from_str(json).map_err(|e| {
        let message = e.to_string();
        // serde's tagged-enum error for an unrecognized `type` value.
        let code = if message.contains("unknown variant") {
            ErrorCode::MappingInvalid
        } else {
            ErrorCode::WorkflowInvalid
        };
        EngineError::new(code, format!("Invalid workflow JSON: {message}"))
    })
}

/// Check the structural invariants of a workflow definition:
/// - at least one node,
/// - node ids unique within the workflow,
/// - `fromNode` mappings reference strictly earlier nodes.
pub fn validate_workflow(workflow: &Workflow) -> Result<(), EngineError> {
    if workflow.nodes.is_empty() {
        return Err(EngineError::new(
            ErrorCode::WorkflowInvalid,
            "Workflow must contain at least one node",
        ));
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for node in &workflow.nodes {
        if !seen.insert(node.node_id.as_str()) {
            return Err(EngineError::new(
                ErrorCode::WorkflowInvalid,
                format!("Duplicate node id '{}'", node.node_id),
            )
            .with_detail("node_id", node.node_id.clone()));
        }

        for (key, mapping) in &node.input_mapping {
            if let Mapping::FromNode { node_id: ref_id, .. } = mapping {
                // `seen` already contains the current node, so a self
                // reference is also rejected here.
                if ref_id == &node.node_id || !seen.contains(ref_id.as_str()) {
                    return Err(EngineError::new(
                        ErrorCode::WorkflowInvalid,
                        format!(
                            "Node '{}' references node '{ref_id}' which is not an earlier node",
                            node.node_id
                        ),
                    )
                    .with_detail("node_id", node.node_id.clone())
                    .with_detail("referenced_node", ref_id.clone())
                    .with_detail("key", key.clone()));
                }
            }
        }
    }

    Ok(())
}
