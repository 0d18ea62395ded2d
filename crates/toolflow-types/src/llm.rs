//! LLM client wire types: chat requests, completions, token usage, and the
//! provider error taxonomy with retryability classification.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{EngineError, ErrorCode};

// ---------------------------------------------------------------------------
// Token usage
// ---------------------------------------------------------------------------

/// Token counts reported by the provider for one completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

// ---------------------------------------------------------------------------
// Requests and completions
// ---------------------------------------------------------------------------

/// Base64-encoded image attached to a vision request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAttachment {
    /// MIME type, e.g. `image/png`.
    pub media_type: String,
    /// Base64 payload without a data-URL prefix.
    pub data: String,
}

/// Provider-agnostic chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    /// Request a JSON object response from the provider.
    #[serde(default)]
    pub force_json: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageAttachment>,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            force_json: false,
            temperature: None,
            max_tokens: None,
            model: None,
            images: Vec::new(),
        }
    }
}

/// One completed chat turn: the assistant text plus usage accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletion {
    pub content: String,
    pub model: String,
    #[serde(default)]
    pub usage: TokenUsage,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Provider-side failures. Timeouts and transport failures are retryable;
/// a non-2xx API response is not (the request itself was rejected).
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("llm request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("llm transport error: {0}")]
    Transport(String),

    #[error("llm api returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("llm response could not be parsed: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Transport(_))
    }
}

impl From<LlmError> for EngineError {
    fn from(err: LlmError) -> Self {
        let retryable = err.retryable();
        let mut engine_err = EngineError::new(ErrorCode::LlmApiError, err.to_string());
        if let LlmError::Api { status, .. } = &err {
            engine_err = engine_err.with_detail("status_code", *status);
        }
        if retryable {
            engine_err = engine_err.retryable();
        }
        engine_err
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
