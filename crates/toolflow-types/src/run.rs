//! Run execution types: statuses, per-node traces, cost accounting, results.
//!
//! A run is one execution attempt of a workflow. The engine produces one
//! [`NodeTrace`] per attempted node, in execution order; a node that is never
//! reached (because an earlier node failed) produces no trace at all.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::EngineError;
use crate::llm::TokenUsage;

// ---------------------------------------------------------------------------
// Statuses
// ---------------------------------------------------------------------------

/// Overall status of a workflow run.
///
/// `Pending` and `Running` are transient; the engine itself runs
/// synchronously to a terminal `Success` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunStatus {
    Pending,
    Running,
    Success,
    Failed,
}

/// Status of an individual node execution.
///
/// `Skipped` exists in the wire format but the fail-fast engine never assigns
/// it: nodes after a failure simply have no trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TraceStatus {
    Pending,
    Running,
    Success,
    Failed,
    Skipped,
}

// ---------------------------------------------------------------------------
// Node trace
// ---------------------------------------------------------------------------

/// Error recorded on a failed node trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, Value>,
    #[serde(default)]
    pub retryable: bool,
}

impl From<&EngineError> for TraceError {
    fn from(err: &EngineError) -> Self {
        Self {
            code: err.code.as_str().to_string(),
            message: err.message.clone(),
            details: err.details.clone(),
            retryable: err.retryable,
        }
    }
}

/// Per-node execution record: status, timing, summarized input/output, error.
///
/// Summaries are diagnostic, not a full replay log -- long strings are
/// truncated and containers are reduced to type+length tags by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTrace {
    pub node_id: String,
    pub tool_id: String,
    pub status: TraceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub input_summary: Map<String, Value>,
    #[serde(default)]
    pub output_summary: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TraceError>,
}

impl NodeTrace {
    /// Create a trace in `Running` state with a start timestamp.
    pub fn started(node_id: impl Into<String>, tool_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            tool_id: tool_id.into(),
            status: TraceStatus::Running,
            started_at: Some(Utc::now()),
            ended_at: None,
            input_summary: Map::new(),
            output_summary: Map::new(),
            error: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Cost accounting
// ---------------------------------------------------------------------------

/// Token cost totals for a run. Strictly additive across nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCost {
    pub total_tokens: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl RunCost {
    /// Add one node's token usage to the running totals.
    pub fn add(&mut self, usage: &TokenUsage) {
        self.total_tokens += usage.total_tokens;
        self.prompt_tokens += usage.prompt_tokens;
        self.completion_tokens += usage.completion_tokens;
    }
}

// ---------------------------------------------------------------------------
// Run record and result
// ---------------------------------------------------------------------------

/// Persisted run record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub run_id: Uuid,
    pub workflow_id: Uuid,
    pub status: RunStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl Run {
    /// Create a fresh `Pending` run for a workflow.
    pub fn pending(workflow_id: Uuid) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            workflow_id,
            status: RunStatus::Pending,
            created_at: Utc::now(),
            started_at: None,
            ended_at: None,
        }
    }
}

/// Result of a completed run: terminal status, accumulated node outputs,
/// optional final output, terminal error, traces, and token cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub status: RunStatus,
    /// Output objects keyed by node id, in-order accumulation of successes.
    pub node_outputs: HashMap<String, Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_output: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TraceError>,
    pub traces: Vec<NodeTrace>,
    pub cost: RunCost,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_run_status_wire_format() {
        assert_eq!(serde_json::to_string(&RunStatus::Success).unwrap(), "\"SUCCESS\"");
        let parsed: RunStatus = serde_json::from_str("\"FAILED\"").unwrap();
        assert_eq!(parsed, RunStatus::Failed);
    }

    #[test]
    fn test_trace_status_wire_format() {
        for (status, wire) in [
            (TraceStatus::Pending, "\"PENDING\""),
            (TraceStatus::Running, "\"RUNNING\""),
            (TraceStatus::Success, "\"SUCCESS\""),
            (TraceStatus::Failed, "\"FAILED\""),
            (TraceStatus::Skipped, "\"SKIPPED\""),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), wire);
        }
    }

    #[test]
    fn test_run_cost_additive() {
        let mut cost = RunCost::default();
        for _ in 0..3 {
            cost.add(&TokenUsage {
                prompt_tokens: 6,
                completion_tokens: 4,
                total_tokens: 10,
            });
        }
        assert_eq!(cost.total_tokens, 30);
        assert_eq!(cost.prompt_tokens, 18);
        assert_eq!(cost.completion_tokens, 12);
    }

    #[test]
    fn test_trace_error_from_engine_error() {
        let err = EngineError::new(ErrorCode::PathNotFound, "Path 'meta.x' not found")
            .with_detail("path", "meta.x");
        let trace_err = TraceError::from(&err);
        assert_eq!(trace_err.code, "PATH_NOT_FOUND");
        assert_eq!(trace_err.details["path"], json!("meta.x"));
        assert!(!trace_err.retryable);
    }

    #[test]
    fn test_node_trace_started() {
        let trace = NodeTrace::started("n1", "data.map");
        assert_eq!(trace.status, TraceStatus::Running);
        assert!(trace.started_at.is_some());
        assert!(trace.ended_at.is_none());
        assert!(trace.error.is_none());
    }

    #[test]
    fn test_run_result_json_roundtrip() {
        let result = RunResult {
            status: RunStatus::Success,
            node_outputs: HashMap::from([(
                "n1".to_string(),
                Map::from_iter([("x".to_string(), json!(1))]),
            )]),
            final_output: None,
            error: None,
            traces: vec![NodeTrace::started("n1", "data.map")],
            cost: RunCost::default(),
        };
        let json_str = serde_json::to_string(&result).unwrap();
        let parsed: RunResult = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.status, RunStatus::Success);
        assert_eq!(parsed.node_outputs["n1"]["x"], json!(1));
    }
}
