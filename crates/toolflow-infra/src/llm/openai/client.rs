//! OpenAiClient -- concrete [`LlmClient`] implementation for OpenAI.
//!
//! Sends requests to the Chat Completions API (`/chat/completions`) with
//! bearer authentication. Supports forced JSON mode via `response_format`
//! and vision requests via base64 data-URL image parts.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use toolflow_core::llm::LlmClient;
use toolflow_types::config::EngineConfig;
use toolflow_types::llm::{ChatCompletion, ChatRequest, LlmError, TokenUsage};

use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ContentPart, ErrorResponse,
    ImageUrl, MessageContent, ResponseFormat,
};

/// OpenAI Chat Completions client.
///
/// Implements [`LlmClient`] for the OpenAI API and compatible endpoints.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing the Authorization header. It never appears in Debug
/// output, Display output, or tracing logs.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    request_timeout: Duration,
    vision_timeout: Duration,
}

impl OpenAiClient {
    /// Create a new OpenAI client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key wrapped in SecretString
    /// * `config` - Engine configuration providing base URL, model, and timeouts
    pub fn new(api_key: SecretString, config: &EngineConfig) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: config.api_base.clone(),
            model: config.model.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            vision_timeout: Duration::from_secs(config.vision_timeout_secs),
        }
    }

    /// Create a client from the environment, reading `OPENAI_API_KEY`.
    ///
    /// Returns `None` when the key is unset or empty, letting callers run
    /// the engine without LLM tools.
    pub fn from_env(config: &EngineConfig) -> Option<Self> {
        let key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())?;
        Some(Self::new(SecretString::from(key), config))
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Convert a generic [`ChatRequest`] into a [`ChatCompletionRequest`].
    fn build_request(&self, request: &ChatRequest) -> ChatCompletionRequest {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.model.clone());

        let mut user_text = request.user.clone();
        let mut response_format = None;
        if request.force_json {
            response_format = Some(ResponseFormat::json_object());
            // Providers reject json_object mode unless the prompt mentions JSON.
            if !user_text.to_lowercase().contains("json") {
                user_text.push_str("\n\nRespond in valid JSON format.");
            }
        }

        let user_content = if request.images.is_empty() {
            MessageContent::Text(user_text)
        } else {
            let mut parts = vec![ContentPart::Text { text: user_text }];
            for image in &request.images {
                parts.push(ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: format!("data:{};base64,{}", image.media_type, image.data),
                    },
                });
            }
            MessageContent::Parts(parts)
        };

        ChatCompletionRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: MessageContent::Text(request.system.clone()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_content,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format,
        }
    }
}

// OpenAiClient intentionally does NOT derive Debug to prevent accidental
// exposure of internal state. The SecretString field ensures the API key
// is never printed, but we also omit Debug entirely for defense-in-depth.

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatCompletion, LlmError> {
        let body = self.build_request(request);
        let requested_model = body.model.clone();

        // Vision requests routinely take longer than text-only chat.
        let timeout = if request.images.is_empty() {
            self.request_timeout
        } else {
            self.vision_timeout
        };

        let response = self
            .client
            .post(self.url("/chat/completions"))
            .timeout(timeout)
            .bearer_auth(self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout {
                        seconds: timeout.as_secs(),
                    }
                } else {
                    LlmError::Transport(format!("HTTP request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            // Prefer the structured error message, fall back to the raw body.
            let message = serde_json::from_str::<ErrorResponse>(&error_body)
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or(error_body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("failed to parse response: {e}")))?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        let usage = payload
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        Ok(ChatCompletion {
            content,
            model: payload.model.unwrap_or(requested_model),
            usage,
        })
    }

    fn default_model(&self) -> &str {
        &self.model
    }
}
