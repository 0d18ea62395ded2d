//! Infrastructure layer for Toolflow.
//!
//! Contains implementations of the ports defined in `toolflow-core`:
//! SQLite storage for workflows, runs, traces, and uploaded files, plus
//! an OpenAI Chat Completions client behind the `LlmClient` trait.

pub mod llm;
pub mod sqlite;
