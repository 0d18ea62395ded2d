//! LLM client abstraction.
//!
//! Tools receive the client as `Arc<dyn LlmClient>` through their execution
//! context, so the trait uses `async_trait` for object safety (unlike the
//! store traits, which are consumed generically and stay RPITIT).

use async_trait::async_trait;

use toolflow_types::llm::{ChatCompletion, ChatRequest, LlmError};

/// Object-safe chat completion client.
///
/// The production implementation lives in toolflow-infra (`OpenAiClient`);
/// tests substitute scripted fakes.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a chat request and receive the full completion.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatCompletion, LlmError>;

    /// Default model name used when a request does not name one.
    fn default_model(&self) -> &str;
}

impl std::fmt::Debug for dyn LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("default_model", &self.default_model())
            .finish_non_exhaustive()
    }
}
