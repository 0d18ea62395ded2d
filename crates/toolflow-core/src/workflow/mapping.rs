//! Input mapping evaluation.
//!
//! At execution time each node's declarative `input_mapping` is evaluated
//! against the outputs of already-executed nodes to produce the actual tool
//! input object. References to nodes that have not executed, or paths that
//! do not resolve, fail immediately with `PATH_NOT_FOUND`.

use std::collections::HashMap;

use serde_json::{Map, Value};

use toolflow_types::error::{EngineError, ErrorCode};
use toolflow_types::workflow::Mapping;

/// Evaluates input mappings against the accumulated node outputs of a run.
pub struct MappingEvaluator<'a> {
    node_outputs: &'a HashMap<String, Map<String, Value>>,
}

impl<'a> MappingEvaluator<'a> {
    pub fn new(node_outputs: &'a HashMap<String, Map<String, Value>>) -> Self {
        Self { node_outputs }
    }

    /// Evaluate a full input mapping, producing the tool input object.
    ///
    /// `current_node_id` only feeds error details.
    pub fn evaluate(
        &self,
        input_mapping: &HashMap<String, Mapping>,
        current_node_id: &str,
    ) -> Result<Map<String, Value>, EngineError> {
        let mut result = Map::new();
        for (key, mapping) in input_mapping {
            let value = self.evaluate_single(mapping, current_node_id, key)?;
            result.insert(key.clone(), value);
        }
        Ok(result)
    }

    fn evaluate_single(
        &self,
        mapping: &Mapping,
        current_node_id: &str,
        key: &str,
    ) -> Result<Value, EngineError> {
        match mapping {
            Mapping::Constant { value } => Ok(value.clone()),
            Mapping::FromNode { node_id, path } => {
                self.evaluate_from_node(node_id, path, current_node_id, key)
            }
        }
    }

    fn evaluate_from_node(
        &self,
        ref_node_id: &str,
        path: &str,
        current_node_id: &str,
        key: &str,
    ) -> Result<Value, EngineError> {
        let Some(node_output) = self.node_outputs.get(ref_node_id) else {
            return Err(EngineError::new(
                ErrorCode::PathNotFound,
                format!("Referenced node '{ref_node_id}' not found or not executed yet"),
            )
            .with_detail("current_node", current_node_id)
            .with_detail("referenced_node", ref_node_id)
            .with_detail("key", key));
        };

        match get_by_path(&Value::Object(node_output.clone()), path) {
            Some(value) if !value.is_null() => Ok(value),
            // A null terminal is indistinguishable from an absent path.
            _ => {
                let available: Vec<Value> = node_output
                    .keys()
                    .map(|k| Value::String(k.clone()))
                    .collect();
                Err(EngineError::new(
                    ErrorCode::PathNotFound,
                    format!("Path '{path}' not found in node '{ref_node_id}' output"),
                )
                .with_detail("current_node", current_node_id)
                .with_detail("referenced_node", ref_node_id)
                .with_detail("path", path)
                .with_detail("key", key)
                .with_detail("available_keys", Value::Array(available)))
            }
        }
    }
}

/// Resolve a dot path against a JSON value.
///
/// Each segment is an object key, except that a digit segment applied to an
/// array indexes into it. The empty path resolves to the value itself.
/// Returns `None` when any segment fails to resolve.
pub fn get_by_path(data: &Value, path: &str) -> Option<Value> {
    if path.is_empty() {
        return Some(data.clone());
    }

    let mut current = data;
    for segment in path.split('.') {
        current = match current {
            Value::Object(obj) => obj.get(segment)?,
            Value::Array(arr) => {
                let idx: usize = segment.parse().ok()?;
                arr.get(idx)?
            }
            _ => return None,
        };
    }
    Some(current.clone())
}
