//! Shared domain types for Toolflow.
//!
//! This crate contains the core domain types used across the Toolflow
//! platform: workflow definitions, input mappings, run/trace records, tool
//! schemas, the standardized error taxonomy, and LLM request/response shapes.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod file;
pub mod llm;
pub mod run;
pub mod tool;
pub mod workflow;
