//! Deterministic text processing tools. No LLM calls, no cost.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Map, Value};

use toolflow_types::error::{EngineError, ErrorCode};
use toolflow_types::tool::{Parameter, ParameterType, ToolDefinition};

use crate::tool::{Tool, ToolContext, ToolOutput};
use crate::workflow::mapping::get_by_path;

fn def(
    tool_id: &str,
    name: &str,
    description: &str,
    input_schema: Vec<Parameter>,
    output_schema: Vec<Parameter>,
) -> ToolDefinition {
    ToolDefinition {
        tool_id: tool_id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        version: "1.0.0".to_string(),
        category: "text".to_string(),
        input_schema,
        output_schema,
        has_prompt: false,
    }
}

fn str_input<'a>(inputs: &'a Map<String, Value>, key: &str) -> &'a str {
    inputs.get(key).and_then(Value::as_str).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// text.format
// ---------------------------------------------------------------------------

/// Case/whitespace formatting: uppercase, lowercase, titlecase, trim, slug.
/// An unrecognized format passes the text through unchanged.
pub struct TextFormatTool {
    definition: ToolDefinition,
}

impl TextFormatTool {
    pub fn new() -> Self {
        Self {
            definition: def(
                "text.format",
                "Text Formatter",
                "Converts text between formats",
                vec![
                    Parameter::required("text", ParameterType::String, "Text to convert"),
                    Parameter::optional(
                        "format",
                        ParameterType::String,
                        "uppercase, lowercase, titlecase, trim, slug",
                        Some(json!("trim")),
                    ),
                ],
                vec![Parameter::required("formatted", ParameterType::String, "Converted text")],
            ),
        }
    }
}

impl Default for TextFormatTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for TextFormatTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        inputs: Map<String, Value>,
        _ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        let text = str_input(&inputs, "text");
        let format = inputs.get("format").and_then(Value::as_str).unwrap_or("trim");

        let result = match format {
            "uppercase" => text.to_uppercase(),
            "lowercase" => text.to_lowercase(),
            "titlecase" => titlecase(text),
            "trim" => text.trim().to_string(),
            "slug" => slugify(text),
            _ => text.to_string(),
        };

        let mut out = Map::new();
        out.insert("formatted".to_string(), Value::String(result));
        Ok(ToolOutput::of(out))
    }
}

/// Uppercase every letter that follows a non-letter, lowercase the rest.
fn titlecase(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            result.push(c);
            prev_alpha = false;
        }
    }
    result
}

static SLUG_STRIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));
static SLUG_DASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid regex"));

fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = SLUG_STRIP.replace_all(&lowered, "");
    let dashed = SLUG_DASH.replace_all(&stripped, "-");
    dashed.trim_matches('-').to_string()
}

// ---------------------------------------------------------------------------
// text.split
// ---------------------------------------------------------------------------

/// Splits text by delimiter, into non-blank lines, or into fixed-size
/// character chunks.
pub struct TextSplitTool {
    definition: ToolDefinition,
}

impl TextSplitTool {
    pub fn new() -> Self {
        Self {
            definition: def(
                "text.split",
                "Text Splitter",
                "Splits text into parts",
                vec![
                    Parameter::required("text", ParameterType::String, "Text to split"),
                    Parameter::optional(
                        "mode",
                        ParameterType::String,
                        "delimiter, lines, chunks",
                        Some(json!("lines")),
                    ),
                    Parameter::optional(
                        "delimiter",
                        ParameterType::String,
                        "Delimiter for mode=delimiter",
                        Some(json!(",")),
                    ),
                    Parameter::optional(
                        "chunk_size",
                        ParameterType::Integer,
                        "Chunk size for mode=chunks",
                        Some(json!(1000)),
                    ),
                ],
                vec![
                    Parameter::required("parts", ParameterType::Array, "Resulting parts"),
                    Parameter::required("count", ParameterType::Integer, "Number of parts"),
                ],
            ),
        }
    }
}

impl Default for TextSplitTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for TextSplitTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        inputs: Map<String, Value>,
        _ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        let text = str_input(&inputs, "text");
        let mode = inputs.get("mode").and_then(Value::as_str).unwrap_or("lines");
        let delimiter = inputs.get("delimiter").and_then(Value::as_str).unwrap_or(",");
        let chunk_size = inputs
            .get("chunk_size")
            .and_then(Value::as_u64)
            .unwrap_or(1000)
            .max(1) as usize;

        let parts: Vec<String> = match mode {
            "delimiter" => text.split(delimiter).map(|p| p.trim().to_string()).collect(),
            "lines" => text
                .split('\n')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            "chunks" => {
                let chars: Vec<char> = text.chars().collect();
                chars
                    .chunks(chunk_size)
                    .map(|c| c.iter().collect())
                    .collect()
            }
            _ => vec![text.to_string()],
        };

        let mut out = Map::new();
        out.insert("count".to_string(), Value::from(parts.len()));
        out.insert("parts".to_string(), json!(parts));
        Ok(ToolOutput::of(out))
    }
}

// ---------------------------------------------------------------------------
// text.join
// ---------------------------------------------------------------------------

/// Joins an array into one string. Non-string entries are joined as their
/// JSON text.
pub struct TextJoinTool {
    definition: ToolDefinition,
}

impl TextJoinTool {
    pub fn new() -> Self {
        Self {
            definition: def(
                "text.join",
                "Text Joiner",
                "Joins text parts with a separator",
                vec![
                    Parameter::required("parts", ParameterType::Array, "Parts to join"),
                    Parameter::optional(
                        "separator",
                        ParameterType::String,
                        "Separator",
                        Some(json!("\n")),
                    ),
                ],
                vec![Parameter::required("joined", ParameterType::String, "Joined text")],
            ),
        }
    }
}

impl Default for TextJoinTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for TextJoinTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        inputs: Map<String, Value>,
        _ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        let parts = inputs
            .get("parts")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let separator = inputs.get("separator").and_then(Value::as_str).unwrap_or("\n");

        let strings: Vec<String> = parts
            .iter()
            .map(|p| match p {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();

        let mut out = Map::new();
        out.insert("joined".to_string(), Value::String(strings.join(separator)));
        Ok(ToolOutput::of(out))
    }
}

// ---------------------------------------------------------------------------
// text.replace
// ---------------------------------------------------------------------------

/// Literal or regex replacement, reporting how many occurrences matched.
pub struct TextReplaceTool {
    definition: ToolDefinition,
}

impl TextReplaceTool {
    pub fn new() -> Self {
        Self {
            definition: def(
                "text.replace",
                "Text Replacer",
                "Replaces a pattern in text",
                vec![
                    Parameter::required("text", ParameterType::String, "Target text"),
                    Parameter::required("pattern", ParameterType::String, "Pattern to find"),
                    Parameter::required("replacement", ParameterType::String, "Replacement text"),
                    Parameter::optional(
                        "use_regex",
                        ParameterType::Boolean,
                        "Treat pattern as a regex",
                        Some(json!(false)),
                    ),
                ],
                vec![
                    Parameter::required("replaced", ParameterType::String, "Resulting text"),
                    Parameter::required("count", ParameterType::Integer, "Occurrences replaced"),
                ],
            ),
        }
    }
}

impl Default for TextReplaceTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for TextReplaceTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        inputs: Map<String, Value>,
        _ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        let text = str_input(&inputs, "text");
        let pattern = str_input(&inputs, "pattern");
        let replacement = str_input(&inputs, "replacement");
        let use_regex = inputs
            .get("use_regex")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let (replaced, count) = if use_regex {
            let re = Regex::new(pattern).map_err(|e| {
                EngineError::new(
                    ErrorCode::ToolInputInvalid,
                    format!("Invalid regex pattern: {e}"),
                )
                .with_detail("tool_id", "text.replace")
                .with_detail("param", "pattern")
            })?;
            let count = re.find_iter(text).count();
            (re.replace_all(text, replacement).into_owned(), count)
        } else if pattern.is_empty() {
            (text.to_string(), 0)
        } else {
            let count = text.matches(pattern).count();
            (text.replace(pattern, replacement), count)
        };

        let mut out = Map::new();
        out.insert("replaced".to_string(), Value::String(replaced));
        out.insert("count".to_string(), Value::from(count));
        Ok(ToolOutput::of(out))
    }
}

// ---------------------------------------------------------------------------
// text.template
// ---------------------------------------------------------------------------

static TEMPLATE_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("valid regex"));

/// `{{variable}}` substitution from a flat variables object. Unknown
/// variables are left as-is.
pub struct TextTemplateTool {
    definition: ToolDefinition,
}

impl TextTemplateTool {
    pub fn new() -> Self {
        Self {
            definition: def(
                "text.template",
                "Text Template",
                "Renders a template with variables",
                vec![
                    Parameter::required("template", ParameterType::String, "Template text"),
                    Parameter::required("variables", ParameterType::Object, "Variable values"),
                ],
                vec![Parameter::required("rendered", ParameterType::String, "Rendered text")],
            ),
        }
    }
}

impl Default for TextTemplateTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for TextTemplateTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        inputs: Map<String, Value>,
        _ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        let template = str_input(&inputs, "template");
        let variables = inputs
            .get("variables")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        let rendered = TEMPLATE_VAR
            .replace_all(template, |caps: &regex::Captures<'_>| {
                let name = caps[1].trim();
                match variables.get(name) {
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned();

        let mut out = Map::new();
        out.insert("rendered".to_string(), Value::String(rendered));
        Ok(ToolOutput::of(out))
    }
}

// ---------------------------------------------------------------------------
// text.stats
// ---------------------------------------------------------------------------

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").expect("valid regex"));
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

/// Character, word, sentence, and line counts plus average word length.
pub struct TextStatsTool {
    definition: ToolDefinition,
}

impl TextStatsTool {
    pub fn new() -> Self {
        Self {
            definition: def(
                "text.stats",
                "Text Statistics",
                "Computes text statistics",
                vec![Parameter::required("text", ParameterType::String, "Text to analyze")],
                vec![Parameter::required("stats", ParameterType::Object, "Counts and averages")],
            ),
        }
    }
}

impl Default for TextStatsTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for TextStatsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        inputs: Map<String, Value>,
        _ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        let text = str_input(&inputs, "text");

        let words: Vec<&str> = WORD.find_iter(text).map(|m| m.as_str()).collect();
        let sentence_count = SENTENCE_END
            .split(text)
            .filter(|s| !s.trim().is_empty())
            .count();
        let line_count = text.split('\n').filter(|l| !l.trim().is_empty()).count();

        let char_count = text.chars().count();
        let char_count_no_spaces = text.chars().filter(|c| *c != ' ' && *c != '\n').count();
        let avg_word_length = if words.is_empty() {
            0.0
        } else {
            words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / words.len() as f64
        };

        let mut out = Map::new();
        out.insert(
            "stats".to_string(),
            json!({
                "char_count": char_count,
                "char_count_no_spaces": char_count_no_spaces,
                "word_count": words.len(),
                "sentence_count": sentence_count,
                "line_count": line_count,
                "avg_word_length": avg_word_length,
            }),
        );
        Ok(ToolOutput::of(out))
    }
}

// ---------------------------------------------------------------------------
// text.json
// ---------------------------------------------------------------------------

/// JSON parse/stringify with optional dot-path extraction on parse.
pub struct JsonTool {
    definition: ToolDefinition,
}

impl JsonTool {
    pub fn new() -> Self {
        Self {
            definition: def(
                "text.json",
                "JSON Parser",
                "Parses or stringifies JSON",
                vec![
                    Parameter::required("input", ParameterType::Any, "JSON string or value"),
                    Parameter::optional(
                        "mode",
                        ParameterType::String,
                        "'parse' or 'stringify'",
                        Some(json!("parse")),
                    ),
                    Parameter::optional(
                        "path",
                        ParameterType::String,
                        "Dot-path to extract after parsing",
                        Some(json!("")),
                    ),
                ],
                vec![Parameter::required("result", ParameterType::Any, "Parsed or stringified value")],
            ),
        }
    }
}

impl Default for JsonTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for JsonTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        inputs: Map<String, Value>,
        _ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        let input = inputs.get("input").cloned().unwrap_or(Value::Null);
        let mode = inputs.get("mode").and_then(Value::as_str).unwrap_or("parse");
        let path = inputs.get("path").and_then(Value::as_str).unwrap_or("");

        let result = match mode {
            "parse" => {
                let parsed = match &input {
                    Value::String(s) => serde_json::from_str::<Value>(s).map_err(|e| {
                        EngineError::new(ErrorCode::ToolInputInvalid, format!("Invalid JSON: {e}"))
                            .with_detail("tool_id", "text.json")
                            .with_detail("error", e.to_string())
                    })?,
                    other => other.clone(),
                };
                if path.is_empty() {
                    parsed
                } else {
                    get_by_path(&parsed, path).unwrap_or(Value::Null)
                }
            }
            "stringify" => match &input {
                Value::String(s) => Value::String(s.clone()),
                other => {
                    let pretty = serde_json::to_string_pretty(other).map_err(|e| {
                        EngineError::internal(format!("serialize value: {e}"))
                    })?;
                    Value::String(pretty)
                }
            },
            _ => input,
        };

        let mut out = Map::new();
        out.insert("result".to_string(), result);
        Ok(ToolOutput::of(out))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
