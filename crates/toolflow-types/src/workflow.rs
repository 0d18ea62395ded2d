//! Workflow domain types for Toolflow.
//!
//! A workflow is an immutable, ordered list of nodes plus an optional
//! final-output mapping. Each node binds a versioned tool to a declarative
//! `input_mapping` that describes where its inputs come from: literal
//! constants, or dot-path references into the output of an earlier node.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Workflow definition
// ---------------------------------------------------------------------------

/// A workflow definition: ordered nodes plus an optional final-output mapping.
///
/// Workflows are versionless; editing replaces the whole node list. Nodes are
/// never reordered or mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    /// UUIDv7 assigned on first save.
    pub workflow_id: Uuid,
    /// Owning project identifier.
    #[serde(default = "default_project_id")]
    pub project_id: String,
    /// Human-readable workflow name.
    pub name: String,
    /// Optional longer description.
    #[serde(default)]
    pub description: String,
    /// Ordered list of nodes, executed strictly in sequence.
    pub nodes: Vec<Node>,
    /// Optional mapping that assembles the run's final output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_output: Option<FinalOutput>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_project_id() -> String {
    "default".to_string()
}

/// A single step in a workflow, binding a tool version to an input mapping.
///
/// `node_id` is the addressable key other nodes use to reference this node's
/// output; it must be unique within the workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub node_id: String,
    pub tool_id: String,
    /// Pinned tool version (e.g. "1.0.0").
    pub version: String,
    /// Declarative input mapping, one entry per tool input key.
    #[serde(default)]
    pub input_mapping: HashMap<String, Mapping>,
    /// Prompt configuration, only meaningful for prompt-driven tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<PromptConfig>,
}

// ---------------------------------------------------------------------------
// Input mapping
// ---------------------------------------------------------------------------

/// Declarative rule producing one tool input value.
///
/// Closed sum type tagged by `type` on the wire:
/// ```json
/// { "type": "constant", "value": 5 }
/// { "type": "fromNode", "node_id": "n1", "path": "meta.chars" }
/// ```
/// Unknown tags are rejected at deserialization, not at evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Mapping {
    /// A fixed literal value, independent of run state.
    #[serde(rename = "constant")]
    Constant { value: Value },
    /// A value extracted from an already-executed node's output at a
    /// dot/array-index path (e.g. `"meta.chars"`, `"items.0.name"`).
    #[serde(rename = "fromNode")]
    FromNode { node_id: String, path: String },
}

// ---------------------------------------------------------------------------
// Prompt configuration
// ---------------------------------------------------------------------------

/// Prompt settings for a prompt-driven (LLM-backed) tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// System prompt.
    #[serde(default = "default_system_prompt")]
    pub system: String,
    /// User prompt template with `{{input.<path>}}` placeholders.
    pub user: String,
    /// Request a structured JSON response from the model.
    #[serde(default)]
    pub force_json: bool,
}

fn default_system_prompt() -> String {
    "You are a helpful assistant.".to_string()
}

// ---------------------------------------------------------------------------
// Final output
// ---------------------------------------------------------------------------

/// Final-output definition: an optional declared schema plus a mapping from
/// output keys to node-output paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<FinalOutputSchema>,
    /// Output key -> reference into a node's output.
    pub mapping: HashMap<String, OutputRef>,
}

/// Reference into a node's output, used by final-output mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputRef {
    pub node_id: String,
    pub path: String,
}

/// Declared shape of the final output (documentation only; not enforced).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalOutputSchema {
    #[serde(rename = "type", default = "default_schema_type")]
    pub kind: String,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

fn default_schema_type() -> String {
    "object".to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_workflow() -> Workflow {
        Workflow {
            workflow_id: Uuid::now_v7(),
            project_id: "default".to_string(),
            name: "pdf-digest".to_string(),
            description: "Extract, then summarize".to_string(),
            nodes: vec![
                Node {
                    node_id: "n1".to_string(),
                    tool_id: "text.stats".to_string(),
                    version: "1.0.0".to_string(),
                    input_mapping: HashMap::from([(
                        "text".to_string(),
                        Mapping::Constant {
                            value: json!("hello world"),
                        },
                    )]),
                    prompt: None,
                },
                Node {
                    node_id: "n2".to_string(),
                    tool_id: "llm.summarize".to_string(),
                    version: "1.0.0".to_string(),
                    input_mapping: HashMap::from([(
                        "text".to_string(),
                        Mapping::FromNode {
                            node_id: "n1".to_string(),
                            path: "stats.char_count".to_string(),
                        },
                    )]),
                    prompt: Some(PromptConfig {
                        system: "You are a professional summarizer.".to_string(),
                        user: "Summarize: {{input.text}}".to_string(),
                        force_json: true,
                    }),
                },
            ],
            final_output: Some(FinalOutput {
                schema: None,
                mapping: HashMap::from([(
                    "summary".to_string(),
                    OutputRef {
                        node_id: "n2".to_string(),
                        path: "result".to_string(),
                    },
                )]),
            }),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_workflow_json_roundtrip() {
        let original = sample_workflow();
        let json_str = serde_json::to_string_pretty(&original).unwrap();
        let parsed: Workflow = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.name, "pdf-digest");
        assert_eq!(parsed.nodes.len(), 2);
        assert!(parsed.final_output.is_some());
    }

    #[test]
    fn test_mapping_constant_serde() {
        let mapping = Mapping::Constant { value: json!(5) };
        let json_str = serde_json::to_string(&mapping).unwrap();
        assert!(json_str.contains("\"type\":\"constant\""));
        let parsed: Mapping = serde_json::from_str(&json_str).unwrap();
        assert!(matches!(parsed, Mapping::Constant { .. }));
    }

    #[test]
    fn test_mapping_from_node_serde() {
        let json_str = r#"{"type":"fromNode","node_id":"n1","path":"meta.chars"}"#;
        let parsed: Mapping = serde_json::from_str(json_str).unwrap();
        match parsed {
            Mapping::FromNode { node_id, path } => {
                assert_eq!(node_id, "n1");
                assert_eq!(path, "meta.chars");
            }
            other => panic!("expected fromNode, got {other:?}"),
        }
    }

    #[test]
    fn test_mapping_unknown_tag_rejected() {
        let json_str = r#"{"type":"fromEnv","name":"HOME"}"#;
        let result: Result<Mapping, _> = serde_json::from_str(json_str);
        assert!(result.is_err());
    }

    #[test]
    fn test_prompt_config_default_system() {
        let json_str = r#"{"user":"Summarize {{input.text}}"}"#;
        let prompt: PromptConfig = serde_json::from_str(json_str).unwrap();
        assert_eq!(prompt.system, "You are a helpful assistant.");
        assert!(!prompt.force_json);
    }

    #[test]
    fn test_node_defaults() {
        let json_str = r#"{"node_id":"n1","tool_id":"data.map","version":"1.0.0"}"#;
        let node: Node = serde_json::from_str(json_str).unwrap();
        assert!(node.input_mapping.is_empty());
        assert!(node.prompt.is_none());
    }
}
