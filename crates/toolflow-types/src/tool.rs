//! Tool definitions: parameter schemas and registry metadata.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Parameter schema
// ---------------------------------------------------------------------------

/// Declared type of a tool parameter. JSON-schema-ish, intentionally small.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    /// Skips type checking entirely.
    Any,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Any => "any",
        }
    }
}

/// One declared input parameter of a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl Parameter {
    /// Required parameter with no default.
    pub fn required(name: impl Into<String>, param_type: ParameterType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required: true,
            default: None,
        }
    }

    /// Optional parameter, optionally carrying a default value.
    pub fn optional(
        name: impl Into<String>,
        param_type: ParameterType,
        description: impl Into<String>,
        default: Option<serde_json::Value>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required: false,
            default,
        }
    }
}

// ---------------------------------------------------------------------------
// Tool definition
// ---------------------------------------------------------------------------

/// Registry metadata for a tool: identity, version, category, the declared
/// input parameters used for validation, the shape of what it produces, and
/// whether it accepts a per-node prompt configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub tool_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
    pub category: String,
    #[serde(default)]
    pub input_schema: Vec<Parameter>,
    #[serde(default)]
    pub output_schema: Vec<Parameter>,
    #[serde(default)]
    pub has_prompt: bool,
}

impl ToolDefinition {
    /// Look up a declared input parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.input_schema.iter().find(|p| p.name == name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parameter_type_wire_format() {
        assert_eq!(serde_json::to_string(&ParameterType::String).unwrap(), "\"string\"");
        let parsed: ParameterType = serde_json::from_str("\"any\"").unwrap();
        assert_eq!(parsed, ParameterType::Any);
    }

    #[test]
    fn test_parameter_serializes_type_key() {
        let param = Parameter::required("items", ParameterType::Array, "Input items");
        let value = serde_json::to_value(&param).unwrap();
        assert_eq!(value["type"], json!("array"));
        assert_eq!(value["required"], json!(true));
        assert!(value.get("default").is_none());
    }

    #[test]
    fn test_optional_parameter_default() {
        let param = Parameter::optional("limit", ParameterType::Integer, "Max items", Some(json!(10)));
        assert!(!param.required);
        assert_eq!(param.default, Some(json!(10)));
    }

    #[test]
    fn test_definition_parameter_lookup() {
        let def = ToolDefinition {
            tool_id: "data.select".to_string(),
            name: "Select".to_string(),
            description: String::new(),
            version: "1.0.0".to_string(),
            category: "data".to_string(),
            input_schema: vec![Parameter::required("data", ParameterType::Any, "Source")],
            output_schema: vec![Parameter::required("result", ParameterType::Any, "Selected value")],
            has_prompt: false,
        };
        assert!(def.parameter("data").is_some());
        assert!(def.parameter("missing").is_none());
    }

    #[test]
    fn test_definition_wire_format_includes_schemas() {
        let def = ToolDefinition {
            tool_id: "llm.summarize".to_string(),
            name: "Summarize".to_string(),
            description: "Summarize text".to_string(),
            version: "1.0.0".to_string(),
            category: "llm".to_string(),
            input_schema: vec![Parameter::required("text", ParameterType::String, "Text to summarize")],
            output_schema: vec![Parameter::required("result", ParameterType::String, "Summary")],
            has_prompt: true,
        };
        let value = serde_json::to_value(&def).unwrap();
        assert_eq!(value["has_prompt"], json!(true));
        assert_eq!(value["input_schema"][0]["name"], json!("text"));
        assert_eq!(value["output_schema"][0]["name"], json!("result"));

        // All three fields default when absent from stored metadata.
        let bare: ToolDefinition = serde_json::from_value(json!({
            "tool_id": "x", "name": "X", "version": "1.0.0", "category": "data"
        }))
        .unwrap();
        assert!(bare.input_schema.is_empty());
        assert!(bare.output_schema.is_empty());
        assert!(!bare.has_prompt);
    }
}
