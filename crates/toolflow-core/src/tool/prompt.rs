//! Prompt-driven tool support.
//!
//! LLM-backed tools share a single execution path: take the node's prompt
//! configuration, render `{{input.xxx}}` placeholders from the validated
//! inputs, call the chat client, and shape the completion into an output
//! object. Tools compose `run_prompt` rather than inheriting behavior.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use toolflow_types::error::EngineError;
use toolflow_types::llm::ChatRequest;

use crate::tool::{ToolContext, ToolOutput};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("valid regex"));

/// Per-tool prompt defaults, used when the node carries no prompt config
/// or omits individual fields.
#[derive(Debug, Clone)]
pub struct PromptDefaults {
    pub system: &'static str,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for PromptDefaults {
    fn default() -> Self {
        Self {
            system: "You are a helpful assistant.",
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

/// Render `{{input.xxx}}` placeholders in a user prompt template.
///
/// `xxx` is a dot path into the input object (object keys only). Paths that
/// resolve to a string insert it verbatim; other values are inserted as
/// their JSON text. Unresolvable paths render as the empty string, and
/// placeholders not under `input.` are left untouched.
pub fn render_user_template(template: &str, inputs: &Map<String, Value>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            let path = caps[1].trim();
            match path.strip_prefix("input.") {
                Some(key_path) if !key_path.is_empty() => {
                    match get_nested(inputs, key_path) {
                        Some(Value::String(s)) => s.clone(),
                        Some(Value::Null) | None => String::new(),
                        Some(other) => other.to_string(),
                    }
                }
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn get_nested<'a>(data: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut current: Option<&Value> = None;
    for key in path.split('.') {
        current = match current {
            None => data.get(key),
            Some(Value::Object(obj)) => obj.get(key),
            Some(_) => return None,
        };
        current?;
    }
    current
}

/// Run a prompt-driven tool end to end: take the node's prompt config from
/// the context, render the template, call the LLM, and shape the result.
///
/// With `force_json` the completion content is parsed as a JSON object and
/// used directly as the output; content that is not a JSON object falls back
/// to `{"result": content}`. Without `force_json` the output is always
/// `{"result": content}`.
pub async fn run_prompt(
    inputs: &Map<String, Value>,
    ctx: &ToolContext,
    defaults: &PromptDefaults,
) -> Result<ToolOutput, EngineError> {
    let (system, user_template, force_json) = match &ctx.prompt {
        Some(cfg) => (cfg.system.as_str(), cfg.user.as_str(), cfg.force_json),
        None => (defaults.system, "", false),
    };

    let user = render_user_template(user_template, inputs);

    let mut request = ChatRequest::new(system, user);
    request.force_json = force_json;
    request.temperature = Some(defaults.temperature);
    request.max_tokens = Some(defaults.max_tokens);

    let completion = ctx.llm()?.chat(&request).await?;
    let usage = completion.usage;

    let value = if force_json {
        match serde_json::from_str::<Value>(&completion.content) {
            Ok(Value::Object(obj)) => obj,
            _ => result_object(completion.content),
        }
    } else {
        result_object(completion.content)
    };

    Ok(ToolOutput::with_usage(value, usage))
}

fn result_object(content: String) -> Map<String, Value> {
    Map::from_iter([("result".to_string(), Value::String(content))])
}
