//! Prompt-driven tools backed by the chat client.
//!
//! Each tool declares its input schema and per-tool prompt defaults, then
//! delegates to `run_prompt`: the node's prompt config drives the actual
//! system/user prompts, and token usage flows back through `ToolOutput`.
//! The vision tool is the exception: it builds its chat request directly
//! from its inputs instead of a node prompt.

use async_trait::async_trait;
use base64::Engine;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use toolflow_types::error::{EngineError, ErrorCode};
use toolflow_types::llm::{ChatRequest, ImageAttachment};
use toolflow_types::tool::{Parameter, ParameterType, ToolDefinition};

use crate::tool::prompt::{run_prompt, PromptDefaults};
use crate::tool::{Tool, ToolContext, ToolOutput};

fn def(
    tool_id: &str,
    name: &str,
    description: &str,
    input_schema: Vec<Parameter>,
    output_schema: Vec<Parameter>,
    has_prompt: bool,
) -> ToolDefinition {
    ToolDefinition {
        tool_id: tool_id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        version: "1.0.0".to_string(),
        category: "llm".to_string(),
        input_schema,
        output_schema,
        has_prompt,
    }
}

/// Summarizes text. The node prompt decides the summary style.
pub struct SummarizeTool {
    definition: ToolDefinition,
    defaults: PromptDefaults,
}

impl SummarizeTool {
    pub fn new() -> Self {
        Self {
            definition: def(
                "llm.summarize",
                "Text Summarizer",
                "Summarizes text with the LLM",
                vec![Parameter::required("text", ParameterType::String, "Text to summarize")],
                vec![Parameter::required("result", ParameterType::Any, "Summary text or parsed JSON")],
                true,
            ),
            defaults: PromptDefaults {
                system: "You are a professional text summarizer. Provide clear and concise summaries.",
                temperature: 0.5,
                max_tokens: 1000,
            },
        }
    }
}

impl Default for SummarizeTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for SummarizeTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        inputs: Map<String, Value>,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        run_prompt(&inputs, ctx, &self.defaults).await
    }
}

/// Translates text into a target language.
pub struct TranslateTool {
    definition: ToolDefinition,
    defaults: PromptDefaults,
}

impl TranslateTool {
    pub fn new() -> Self {
        Self {
            definition: def(
                "llm.translate",
                "Text Translator",
                "Translates text with the LLM",
                vec![
                    Parameter::required("text", ParameterType::String, "Text to translate"),
                    Parameter::optional(
                        "target_language",
                        ParameterType::String,
                        "Target language (e.g. Korean, English, Japanese)",
                        Some(Value::String("English".to_string())),
                    ),
                ],
                vec![Parameter::required("result", ParameterType::Any, "Translated text")],
                true,
            ),
            defaults: PromptDefaults {
                system: "You are a professional translator. Translate accurately while maintaining the original meaning and tone.",
                temperature: 0.3,
                max_tokens: 2000,
            },
        }
    }
}

impl Default for TranslateTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for TranslateTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        inputs: Map<String, Value>,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        run_prompt(&inputs, ctx, &self.defaults).await
    }
}

/// Extracts structured information from text; typically used with
/// `force_json` so the model's JSON object becomes the node output.
pub struct ExtractTool {
    definition: ToolDefinition,
    defaults: PromptDefaults,
}

impl ExtractTool {
    pub fn new() -> Self {
        Self {
            definition: def(
                "llm.extract",
                "Information Extractor",
                "Extracts structured information from text",
                vec![Parameter::required("text", ParameterType::String, "Source text")],
                vec![Parameter::required("result", ParameterType::Any, "Extracted fields")],
                true,
            ),
            defaults: PromptDefaults {
                system: "You extract structured information from text. Always respond in valid JSON format.",
                temperature: 0.2,
                max_tokens: 1000,
            },
        }
    }
}

impl Default for ExtractTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ExtractTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        inputs: Map<String, Value>,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        run_prompt(&inputs, ctx, &self.defaults).await
    }
}

/// Open-ended text analysis.
pub struct AnalyzeTool {
    definition: ToolDefinition,
    defaults: PromptDefaults,
}

impl AnalyzeTool {
    pub fn new() -> Self {
        Self {
            definition: def(
                "llm.analyze",
                "Text Analyzer",
                "Analyzes text with the LLM",
                vec![Parameter::required("text", ParameterType::String, "Text to analyze")],
                vec![Parameter::required("result", ParameterType::Any, "Analysis text or parsed JSON")],
                true,
            ),
            defaults: PromptDefaults {
                system: "You are an expert text analyst. Provide thorough and insightful analysis.",
                temperature: 0.5,
                max_tokens: 1500,
            },
        }
    }
}

impl Default for AnalyzeTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for AnalyzeTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        inputs: Map<String, Value>,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        run_prompt(&inputs, ctx, &self.defaults).await
    }
}

/// Free-form content generation from an instruction plus optional context.
pub struct GenerateTool {
    definition: ToolDefinition,
    defaults: PromptDefaults,
}

impl GenerateTool {
    pub fn new() -> Self {
        Self {
            definition: def(
                "llm.generate",
                "Content Generator",
                "Generates content from instructions",
                vec![
                    Parameter::required("prompt", ParameterType::String, "Generation instructions"),
                    Parameter::optional(
                        "context",
                        ParameterType::String,
                        "Additional context for the generation",
                        Some(Value::String(String::new())),
                    ),
                ],
                vec![Parameter::required("result", ParameterType::Any, "Generated content")],
                true,
            ),
            defaults: PromptDefaults {
                system: "You are a professional content writer. Generate high-quality content based on the given instructions.",
                temperature: 0.7,
                max_tokens: 2000,
            },
        }
    }
}

impl Default for GenerateTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for GenerateTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        inputs: Map<String, Value>,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        run_prompt(&inputs, ctx, &self.defaults).await
    }
}

// ---------------------------------------------------------------------------
// llm.vision_extract
// ---------------------------------------------------------------------------

const VISION_SYSTEM: &str = "You are an expert document and image analyzer. \n\
    Analyze the provided images and extract information as requested.\n\
    Be thorough and accurate. If you can't find certain information, explicitly state that.";

/// Extracts information from images via a vision-capable model.
///
/// Images arrive either inline as base64 strings (with or without a data-URL
/// prefix) or as `file_ids` referencing uploads in the file store. Unlike
/// the other llm tools, the instruction is a plain `prompt` input rather
/// than a node prompt config.
pub struct VisionExtractTool {
    definition: ToolDefinition,
}

impl VisionExtractTool {
    pub fn new() -> Self {
        Self {
            definition: def(
                "llm.vision_extract",
                "Vision Extractor",
                "Extracts information from images",
                vec![
                    Parameter::optional("images", ParameterType::Array, "Base64-encoded images", None),
                    Parameter::optional("file_ids", ParameterType::Array, "Stored file IDs to attach", None),
                    Parameter::required("prompt", ParameterType::String, "What to extract"),
                    Parameter::optional(
                        "output_format",
                        ParameterType::String,
                        "'json' or 'text'",
                        Some(Value::String("json".to_string())),
                    ),
                    Parameter::optional(
                        "model",
                        ParameterType::String,
                        "Vision-capable model override",
                        Some(Value::String("gpt-4o".to_string())),
                    ),
                ],
                vec![
                    Parameter::required("result", ParameterType::Any, "Extracted data"),
                    Parameter::required("raw_text", ParameterType::String, "Raw model response"),
                ],
                false,
            ),
        }
    }

    async fn collect_images(
        &self,
        inputs: &Map<String, Value>,
        ctx: &ToolContext,
    ) -> Result<Vec<ImageAttachment>, EngineError> {
        let mut images = Vec::new();

        if let Some(inline) = inputs.get("images").and_then(Value::as_array) {
            for entry in inline {
                let Some(encoded) = entry.as_str() else { continue };
                images.push(parse_image(encoded));
            }
        }

        if let Some(file_ids) = inputs.get("file_ids").and_then(Value::as_array) {
            let store = ctx.files()?;
            for id in file_ids {
                let Some(id) = id.as_str() else { continue };
                let file_id = Uuid::parse_str(id).map_err(|_| {
                    EngineError::new(
                        ErrorCode::ToolInputInvalid,
                        format!("Invalid file id '{id}'"),
                    )
                    .with_detail("tool_id", "llm.vision_extract")
                    .with_detail("param", "file_ids")
                })?;
                let file = store.get_file(&file_id).await?.ok_or_else(|| {
                    EngineError::new(
                        ErrorCode::ToolInputInvalid,
                        format!("File {file_id} not found"),
                    )
                    .with_detail("tool_id", "llm.vision_extract")
                    .with_detail("file_id", file_id.to_string())
                })?;
                let content = store.read_content(&file).await?;
                images.push(ImageAttachment {
                    media_type: file.content_type.clone(),
                    data: base64::engine::general_purpose::STANDARD.encode(&content),
                });
            }
        }

        Ok(images)
    }
}

/// Accepts a data URL (`data:image/jpeg;base64,...`) or a bare base64
/// payload, which is assumed to be a PNG.
fn parse_image(encoded: &str) -> ImageAttachment {
    if let Some(rest) = encoded.strip_prefix("data:") {
        if let Some((media_type, data)) = rest.split_once(";base64,") {
            return ImageAttachment {
                media_type: media_type.to_string(),
                data: data.to_string(),
            };
        }
    }
    ImageAttachment {
        media_type: "image/png".to_string(),
        data: encoded.to_string(),
    }
}

impl Default for VisionExtractTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for VisionExtractTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        inputs: Map<String, Value>,
        ctx: &ToolContext,
    ) -> Result<ToolOutput, EngineError> {
        let prompt = inputs.get("prompt").and_then(Value::as_str).unwrap_or_default();
        if prompt.is_empty() {
            return Err(EngineError::new(ErrorCode::ToolInputInvalid, "Prompt is required")
                .with_detail("tool_id", "llm.vision_extract")
                .with_detail("param", "prompt"));
        }

        let images = self.collect_images(&inputs, ctx).await?;
        if images.is_empty() {
            return Err(EngineError::new(ErrorCode::ToolInputInvalid, "No images provided")
                .with_detail("tool_id", "llm.vision_extract")
                .with_detail("images_count", 0));
        }

        let output_format = inputs
            .get("output_format")
            .and_then(Value::as_str)
            .unwrap_or("json");
        let force_json = output_format == "json";

        let mut system = VISION_SYSTEM.to_string();
        if force_json {
            system.push_str("\n\nIMPORTANT: Respond in valid JSON format only.");
        }

        let request = ChatRequest {
            system,
            user: prompt.to_string(),
            force_json,
            temperature: Some(0.2),
            max_tokens: Some(4000),
            model: inputs.get("model").and_then(Value::as_str).map(str::to_string),
            images,
        };

        let completion = ctx.llm()?.chat(&request).await?;

        let result = if force_json {
            serde_json::from_str::<Value>(completion.content.trim())
                .unwrap_or_else(|_| json!({"raw_response": completion.content}))
        } else {
            Value::String(completion.content.clone())
        };

        let mut out = Map::new();
        out.insert("result".to_string(), result);
        out.insert("raw_text".to_string(), Value::String(completion.content));
        Ok(ToolOutput::with_usage(out, completion.usage))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use toolflow_types::config::EngineConfig;
    use toolflow_types::error::{ErrorCode, StoreError};
    use toolflow_types::file::StoredFile;
    use toolflow_types::llm::{ChatCompletion, ChatRequest, LlmError, TokenUsage};
    use toolflow_types::workflow::PromptConfig;
    use uuid::Uuid;

    use crate::file::FileStore;
    use crate::llm::LlmClient;

    /// Returns a scripted completion and records the last request.
    struct MockLlm {
        content: String,
        last_request: Mutex<Option<ChatRequest>>,
    }

    impl MockLlm {
        fn new(content: &str) -> Arc<Self> {
            Arc::new(Self {
                content: content.to_string(),
                last_request: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl LlmClient for MockLlm {
        async fn chat(&self, request: &ChatRequest) -> Result<ChatCompletion, LlmError> {
            *self.last_request.lock().unwrap() = Some(request.clone());
            Ok(ChatCompletion {
                content: self.content.clone(),
                model: "mock".to_string(),
                usage: TokenUsage {
                    prompt_tokens: 8,
                    completion_tokens: 4,
                    total_tokens: 12,
                },
            })
        }

        fn default_model(&self) -> &str {
            "mock"
        }
    }

    /// File store backed by a map, preloaded per test.
    struct MapFileStore {
        files: HashMap<Uuid, (StoredFile, Vec<u8>)>,
    }

    impl MapFileStore {
        fn with(file: StoredFile, content: Vec<u8>) -> Arc<Self> {
            Arc::new(Self {
                files: HashMap::from([(file.file_id, (file, content))]),
            })
        }
    }

    #[async_trait]
    impl FileStore for MapFileStore {
        async fn save_file(
            &self,
            _filename: &str,
            _content_type: &str,
            _content: &[u8],
        ) -> Result<StoredFile, StoreError> {
            Err(StoreError::Query("read-only".to_string()))
        }

        async fn get_file(&self, file_id: &Uuid) -> Result<Option<StoredFile>, StoreError> {
            Ok(self.files.get(file_id).map(|(file, _)| file.clone()))
        }

        async fn read_content(&self, file: &StoredFile) -> Result<Vec<u8>, StoreError> {
            self.files
                .get(&file.file_id)
                .map(|(_, content)| content.clone())
                .ok_or(StoreError::NotFound)
        }

        async fn delete_file(&self, _file_id: &Uuid) -> Result<bool, StoreError> {
            Ok(false)
        }

        async fn list_files(&self) -> Result<Vec<StoredFile>, StoreError> {
            Ok(self.files.values().map(|(file, _)| file.clone()).collect())
        }
    }

    fn prompt(user: &str, force_json: bool) -> PromptConfig {
        PromptConfig {
            system: "You are a test assistant.".to_string(),
            user: user.to_string(),
            force_json,
        }
    }

    fn ctx_with(llm: Arc<MockLlm>, prompt_config: PromptConfig) -> ToolContext {
        ToolContext::new(Uuid::now_v7(), "n1", Arc::new(EngineConfig::default()))
            .with_llm(llm)
            .with_prompt(prompt_config)
    }

    fn vision_ctx(llm: Arc<MockLlm>) -> ToolContext {
        ToolContext::new(Uuid::now_v7(), "n1", Arc::new(EngineConfig::default())).with_llm(llm)
    }

    fn inputs(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_summarize_renders_template_and_returns_usage() {
        let llm = MockLlm::new("A short summary.");
        let ctx = ctx_with(Arc::clone(&llm), prompt("Summarize: {{input.text}}", false));

        let out = SummarizeTool::new()
            .run(inputs(json!({"text": "long document"})), &ctx)
            .await
            .unwrap();

        assert_eq!(out.value["result"], json!("A short summary."));
        assert_eq!(out.usage.unwrap().total_tokens, 12);

        let request = llm.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.user, "Summarize: long document");
        assert_eq!(request.system, "You are a test assistant.");
        assert_eq!(request.temperature, Some(0.5));
        assert_eq!(request.max_tokens, Some(1000));
    }

    #[tokio::test]
    async fn test_extract_force_json_parses_object() {
        let llm = MockLlm::new(r#"{"name": "Kim", "email": "kim@example.com"}"#);
        let ctx = ctx_with(llm, prompt("Extract from: {{input.text}}", true));

        let out = ExtractTool::new()
            .run(inputs(json!({"text": "..."})), &ctx)
            .await
            .unwrap();

        assert_eq!(out.value["name"], json!("Kim"));
        assert_eq!(out.value["email"], json!("kim@example.com"));
    }

    #[tokio::test]
    async fn test_force_json_fallback_on_non_object() {
        let llm = MockLlm::new("not json at all");
        let ctx = ctx_with(llm, prompt("Extract", true));

        let out = ExtractTool::new()
            .run(inputs(json!({"text": "..."})), &ctx)
            .await
            .unwrap();

        assert_eq!(out.value["result"], json!("not json at all"));
    }

    #[tokio::test]
    async fn test_translate_defaults_fill_target_language() {
        let llm = MockLlm::new("Bonjour");
        let ctx = ctx_with(
            Arc::clone(&llm),
            prompt("Translate to {{input.target_language}}: {{input.text}}", false),
        );

        let out = TranslateTool::new()
            .run(inputs(json!({"text": "Hello"})), &ctx)
            .await
            .unwrap();

        assert_eq!(out.value["result"], json!("Bonjour"));
        let request = llm.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.user, "Translate to English: Hello");
    }

    #[tokio::test]
    async fn test_analyze_uses_analyst_defaults() {
        let llm = MockLlm::new("The text is optimistic in tone.");
        let ctx = ctx_with(Arc::clone(&llm), prompt("Analyze: {{input.text}}", false));

        let out = AnalyzeTool::new()
            .run(inputs(json!({"text": "We shipped it!"})), &ctx)
            .await
            .unwrap();

        assert_eq!(out.value["result"], json!("The text is optimistic in tone."));
        let request = llm.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.temperature, Some(0.5));
        assert_eq!(request.max_tokens, Some(1500));
    }

    #[tokio::test]
    async fn test_generate_fills_empty_context_default() {
        let llm = MockLlm::new("Draft post.");
        let ctx = ctx_with(
            Arc::clone(&llm),
            prompt("Write: {{input.prompt}}{{input.context}}", false),
        );

        let out = GenerateTool::new()
            .run(inputs(json!({"prompt": "a blog post"})), &ctx)
            .await
            .unwrap();

        assert_eq!(out.value["result"], json!("Draft post."));
        let request = llm.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.user, "Write: a blog post");
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(2000));
    }

    #[tokio::test]
    async fn test_missing_llm_client_is_internal_error() {
        let ctx = ToolContext::new(Uuid::now_v7(), "n1", Arc::new(EngineConfig::default()))
            .with_prompt(prompt("Summarize: {{input.text}}", false));

        let err = SummarizeTool::new()
            .run(inputs(json!({"text": "x"})), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn test_vision_parses_json_and_keeps_raw_text() {
        let llm = MockLlm::new(r#"{"invoice_total": "42.00"}"#);
        let ctx = vision_ctx(Arc::clone(&llm));

        let out = VisionExtractTool::new()
            .run(
                inputs(json!({
                    "images": ["data:image/jpeg;base64,AAAA", "QkJCQg=="],
                    "prompt": "Extract the invoice total"
                })),
                &ctx,
            )
            .await
            .unwrap();

        assert_eq!(out.value["result"]["invoice_total"], json!("42.00"));
        assert_eq!(out.value["raw_text"], json!(r#"{"invoice_total": "42.00"}"#));
        assert_eq!(out.usage.unwrap().total_tokens, 12);

        let request = llm.last_request.lock().unwrap().clone().unwrap();
        assert!(request.force_json);
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.max_tokens, Some(4000));
        assert_eq!(request.model.as_deref(), Some("gpt-4o"));
        assert!(request.system.ends_with("IMPORTANT: Respond in valid JSON format only."));
        // Data-URL prefix is split off; bare base64 defaults to PNG.
        assert_eq!(request.images[0].media_type, "image/jpeg");
        assert_eq!(request.images[0].data, "AAAA");
        assert_eq!(request.images[1].media_type, "image/png");
        assert_eq!(request.images[1].data, "QkJCQg==");
    }

    #[tokio::test]
    async fn test_vision_text_format_returns_content_verbatim() {
        let llm = MockLlm::new("The receipt is from a bakery.");
        let ctx = vision_ctx(Arc::clone(&llm));

        let out = VisionExtractTool::new()
            .run(
                inputs(json!({
                    "images": ["AAAA"],
                    "prompt": "Describe the receipt",
                    "output_format": "text"
                })),
                &ctx,
            )
            .await
            .unwrap();

        assert_eq!(out.value["result"], json!("The receipt is from a bakery."));
        let request = llm.last_request.lock().unwrap().clone().unwrap();
        assert!(!request.force_json);
        assert!(!request.system.contains("IMPORTANT"));
    }

    #[tokio::test]
    async fn test_vision_unparseable_json_falls_back_to_raw_response() {
        let llm = MockLlm::new("not valid json");
        let ctx = vision_ctx(llm);

        let out = VisionExtractTool::new()
            .run(
                inputs(json!({"images": ["AAAA"], "prompt": "Extract"})),
                &ctx,
            )
            .await
            .unwrap();

        assert_eq!(out.value["result"]["raw_response"], json!("not valid json"));
    }

    #[tokio::test]
    async fn test_vision_without_images_rejected() {
        let llm = MockLlm::new("{}");
        let ctx = vision_ctx(llm);

        let err = VisionExtractTool::new()
            .run(inputs(json!({"images": [], "prompt": "Extract"})), &ctx)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ToolInputInvalid);
        assert_eq!(err.details["images_count"], json!(0));
    }

    #[tokio::test]
    async fn test_vision_attaches_stored_files() {
        let file = StoredFile::new("scan.jpg", "image/jpeg", 4, "uploads/scan.jpg");
        let file_id = file.file_id;
        let files = MapFileStore::with(file, b"\xff\xd8\xff\xe0".to_vec());

        let llm = MockLlm::new(r#"{"ok": true}"#);
        let ctx = vision_ctx(Arc::clone(&llm)).with_files(files);

        let out = VisionExtractTool::new()
            .run(
                inputs(json!({
                    "file_ids": [file_id.to_string()],
                    "prompt": "Extract"
                })),
                &ctx,
            )
            .await
            .unwrap();

        assert_eq!(out.value["result"]["ok"], json!(true));
        let request = llm.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.images[0].media_type, "image/jpeg");
        assert_eq!(
            request.images[0].data,
            base64::engine::general_purpose::STANDARD.encode(b"\xff\xd8\xff\xe0")
        );
    }

    #[tokio::test]
    async fn test_vision_unknown_file_id_rejected() {
        let file = StoredFile::new("scan.jpg", "image/jpeg", 4, "uploads/scan.jpg");
        let files = MapFileStore::with(file, vec![0]);

        let llm = MockLlm::new("{}");
        let ctx = vision_ctx(llm).with_files(files);

        let err = VisionExtractTool::new()
            .run(
                inputs(json!({
                    "file_ids": [Uuid::now_v7().to_string()],
                    "prompt": "Extract"
                })),
                &ctx,
            )
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ToolInputInvalid);
        assert!(err.message.contains("not found"));
    }
}
