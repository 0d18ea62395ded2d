//! Tool abstraction: the `Tool` trait, execution context, and output shape.
//!
//! A tool is a named, versioned unit of work with a declared parameter
//! schema. Validation is generic over the schema and runs before every
//! execution; `run` composes the two so callers never skip validation.

pub mod builtin;
pub mod prompt;
pub mod registry;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use toolflow_types::config::EngineConfig;
use toolflow_types::error::{EngineError, ErrorCode};
use toolflow_types::llm::TokenUsage;
use toolflow_types::tool::{Parameter, ParameterType, ToolDefinition};
use toolflow_types::workflow::PromptConfig;

use crate::file::FileStore;
use crate::llm::LlmClient;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Result of one tool execution: the output object plus any token usage the
/// tool incurred. Usage is an explicit part of the return value so the
/// engine can account cost without side channels.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub value: Map<String, Value>,
    pub usage: Option<TokenUsage>,
}

impl ToolOutput {
    /// Output with no token usage (non-LLM tools).
    pub fn of(value: Map<String, Value>) -> Self {
        Self { value, usage: None }
    }

    /// Output carrying token usage from an LLM call.
    pub fn with_usage(value: Map<String, Value>, usage: TokenUsage) -> Self {
        Self {
            value,
            usage: Some(usage),
        }
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Per-node execution context handed to tools.
///
/// The LLM client and file store are optional: data and text tools run
/// without either, and a tool that needs one fails with a clear error when
/// it is absent rather than at construction time. The prompt config is
/// carried from the node for prompt-driven tools.
#[derive(Clone)]
pub struct ToolContext {
    pub run_id: Uuid,
    pub node_id: String,
    pub config: Arc<EngineConfig>,
    pub prompt: Option<PromptConfig>,
    llm: Option<Arc<dyn LlmClient>>,
    files: Option<Arc<dyn FileStore>>,
}

impl ToolContext {
    pub fn new(run_id: Uuid, node_id: impl Into<String>, config: Arc<EngineConfig>) -> Self {
        Self {
            run_id,
            node_id: node_id.into(),
            config,
            prompt: None,
            llm: None,
            files: None,
        }
    }

    pub fn with_prompt(mut self, prompt: PromptConfig) -> Self {
        self.prompt = Some(prompt);
        self
    }

    pub fn with_llm(mut self, llm: Arc<dyn LlmClient>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn with_files(mut self, files: Arc<dyn FileStore>) -> Self {
        self.files = Some(files);
        self
    }

    /// The LLM client, or an `INTERNAL_ERROR` if none is configured.
    pub fn llm(&self) -> Result<&Arc<dyn LlmClient>, EngineError> {
        self.llm.as_ref().ok_or_else(|| {
            EngineError::new(
                ErrorCode::InternalError,
                "LLM client not available in context",
            )
        })
    }

    /// The file store, or an `INTERNAL_ERROR` if none is configured.
    pub fn files(&self) -> Result<&Arc<dyn FileStore>, EngineError> {
        self.files.as_ref().ok_or_else(|| {
            EngineError::new(
                ErrorCode::InternalError,
                "File store not available in context",
            )
        })
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// An executable tool.
///
/// Implementations provide `definition` and `execute`; `validate_inputs`
/// and `run` are generic over the declared parameter schema and should not
/// normally be overridden.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Registry metadata and parameter schema.
    fn definition(&self) -> &ToolDefinition;

    /// Execute with already-validated inputs.
    async fn execute(
        &self,
        inputs: Map<String, Value>,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError>;

    /// Check inputs against the declared schema: required parameters must be
    /// present, defaults are filled in for absent optional parameters, and
    /// present values must match their declared type.
    ///
    /// Returns the validated (and default-filled) input object.
    fn validate_inputs(&self, inputs: Map<String, Value>) -> Result<Map<String, Value>, EngineError> {
        validate_against(self.definition(), inputs)
    }

    /// Validate then execute. This is the only entry point the engine uses.
    async fn run(
        &self,
        inputs: Map<String, Value>,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        let validated = self.validate_inputs(inputs)?;
        self.execute(validated, ctx).await
    }
}

impl std::fmt::Debug for dyn Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("tool_id", &self.definition().tool_id)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_against(
    def: &ToolDefinition,
    mut inputs: Map<String, Value>,
) -> Result<Map<String, Value>, EngineError> {
    for param in &def.input_schema {
        match inputs.get(&param.name) {
            None | Some(Value::Null) => {
                if param.required {
                    return Err(EngineError::new(
                        ErrorCode::ToolInputInvalid,
                        format!("Missing required parameter '{}'", param.name),
                    )
                    .with_detail("tool_id", def.tool_id.clone())
                    .with_detail("param", param.name.clone()));
                }
                if let Some(default) = &param.default {
                    inputs.insert(param.name.clone(), default.clone());
                }
            }
            Some(value) => {
                if !type_matches(param, value) {
                    return Err(EngineError::new(
                        ErrorCode::ToolInputInvalid,
                        format!("Parameter '{}' has wrong type", param.name),
                    )
                    .with_detail("tool_id", def.tool_id.clone())
                    .with_detail("param", param.name.clone())
                    .with_detail("expected_type", param.param_type.as_str())
                    .with_detail("actual_type", json_type_name(value)));
                }
            }
        }
    }
    Ok(inputs)
}

fn type_matches(param: &Parameter, value: &Value) -> bool {
    match param.param_type {
        ParameterType::Any => true,
        ParameterType::String => value.is_string(),
        ParameterType::Number => value.is_number(),
        // JSON has no integer type of its own; accept any number without
        // a fractional part.
        ParameterType::Integer => value.is_i64() || value.is_u64(),
        ParameterType::Boolean => value.is_boolean(),
        ParameterType::Array => value.is_array(),
        ParameterType::Object => value.is_object(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
