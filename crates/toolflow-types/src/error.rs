//! Standardized error taxonomy for the workflow engine.
//!
//! Every failure the engine can anticipate is represented as an
//! [`EngineError`]: a `(code, message, details, retryable)` tuple. The error
//! is attached to the failing node's trace and to the run's terminal error.
//! `retryable` is advisory metadata for an external caller -- the engine
//! itself never retries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ErrorCode
// ---------------------------------------------------------------------------

/// Standard error codes.
///
/// Wire form is SCREAMING_SNAKE_CASE (e.g. `TOOL_INPUT_INVALID`), matching
/// the platform's standardized error format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed external request, not tool-specific.
    InputInvalid,
    /// Required tool parameter missing or wrong shape.
    ToolInputInvalid,
    /// Structurally invalid workflow definition.
    WorkflowInvalid,
    /// Unrecognized input mapping tag.
    MappingInvalid,
    /// `fromNode` reference or dot-path unresolved.
    PathNotFound,
    /// Reserved for access-control denial.
    PolicyBlocked,
    /// Tool lookup miss.
    ToolNotFound,
    /// Workflow lookup miss.
    WorkflowNotFound,
    /// Run lookup miss.
    RunNotFound,
    /// Node lookup miss.
    NodeNotFound,
    /// Tool raised an unexpected error.
    ExecutionFailed,
    /// LLM capability transport/timeout/non-2xx failure.
    LlmApiError,
    /// Engine misconfiguration (e.g. missing credentials).
    InternalError,
}

impl ErrorCode {
    /// The wire-format string for this code (e.g. `"PATH_NOT_FOUND"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InputInvalid => "INPUT_INVALID",
            ErrorCode::ToolInputInvalid => "TOOL_INPUT_INVALID",
            ErrorCode::WorkflowInvalid => "WORKFLOW_INVALID",
            ErrorCode::MappingInvalid => "MAPPING_INVALID",
            ErrorCode::PathNotFound => "PATH_NOT_FOUND",
            ErrorCode::PolicyBlocked => "POLICY_BLOCKED",
            ErrorCode::ToolNotFound => "TOOL_NOT_FOUND",
            ErrorCode::WorkflowNotFound => "WORKFLOW_NOT_FOUND",
            ErrorCode::RunNotFound => "RUN_NOT_FOUND",
            ErrorCode::NodeNotFound => "NODE_NOT_FOUND",
            ErrorCode::ExecutionFailed => "EXECUTION_FAILED",
            ErrorCode::LlmApiError => "LLM_API_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EngineError
// ---------------------------------------------------------------------------

/// A classified workflow engine failure.
///
/// Carries the standard error code, a human-readable message, structured
/// diagnostic details, and an advisory retryable flag.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct EngineError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, Value>,
    #[serde(default)]
    pub retryable: bool,
}

impl EngineError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: BTreeMap::new(),
            retryable: false,
        }
    }

    /// Attach one structured detail entry.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Mark the error as retryable (advisory only).
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }

    /// Shorthand for an [`ErrorCode::ExecutionFailed`] error.
    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExecutionFailed, message)
    }

    /// Shorthand for an [`ErrorCode::InternalError`] error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Errors from store operations (used by trait definitions in toolflow-core).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        EngineError::internal(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
