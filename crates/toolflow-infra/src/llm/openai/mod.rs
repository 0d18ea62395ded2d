//! OpenAI Chat Completions client implementation.
//!
//! This module provides the [`OpenAiClient`] which implements the
//! [`LlmClient`](toolflow_core::llm::LlmClient) trait against the
//! `/chat/completions` endpoint, including JSON mode and vision requests.

pub mod client;
pub mod types;

pub use client::OpenAiClient;
