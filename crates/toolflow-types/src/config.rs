//! Engine configuration.
//!
//! `EngineConfig` controls the database location, LLM endpoint, request
//! timeouts, upload storage, and trace summarization. All fields have
//! defaults so an empty
//! config file (or empty environment) yields a working configuration.

use std::env;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the workflow engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// SQLite connection URL for workflow and run persistence.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Default model for chat completions.
    #[serde(default = "default_model")]
    pub model: String,

    /// Timeout for standard chat requests, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Timeout for vision requests (image payloads are slower), in seconds.
    #[serde(default = "default_vision_timeout_secs")]
    pub vision_timeout_secs: u64,

    /// Directory where uploaded file content is stored.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,

    /// Maximum string length in trace summaries before truncation.
    #[serde(default = "default_summary_max_chars")]
    pub summary_max_chars: usize,
}

fn default_database_url() -> String {
    "sqlite://toolflow.db?mode=rwc".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-5".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_vision_timeout_secs() -> u64 {
    300
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_max_upload_size() -> u64 {
    10 * 1024 * 1024
}

fn default_summary_max_chars() -> usize {
    200
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            api_base: default_api_base(),
            model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
            vision_timeout_secs: default_vision_timeout_secs(),
            upload_dir: default_upload_dir(),
            max_upload_size: default_max_upload_size(),
            summary_max_chars: default_summary_max_chars(),
        }
    }
}

impl EngineConfig {
    /// Build a config from environment variables, falling back to defaults
    /// for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            api_base: env::var("OPENAI_API_BASE").unwrap_or(defaults.api_base),
            model: env::var("OPENAI_MODEL").unwrap_or(defaults.model),
            request_timeout_secs: env_parse("LLM_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            vision_timeout_secs: env_parse("LLM_VISION_TIMEOUT_SECS", defaults.vision_timeout_secs),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or(defaults.upload_dir),
            max_upload_size: env_parse("MAX_UPLOAD_SIZE", defaults.max_upload_size),
            summary_max_chars: defaults.summary_max_chars,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}
