//! LLM client implementations.
//!
//! Contains the [`OpenAiClient`], a `reqwest`-based implementation of the
//! [`LlmClient`](toolflow_core::llm::LlmClient) trait for the OpenAI Chat
//! Completions API. Any OpenAI-compatible endpoint works via the
//! configurable base URL.

pub mod openai;

pub use openai::OpenAiClient;
