//! Workflow engine, tool registry, and store trait definitions for Toolflow.
//!
//! This crate defines the "ports" (store traits) that the infrastructure
//! layer implements. It depends only on `toolflow-types` -- never on
//! `toolflow-infra` or any database/IO crate.

pub mod file;
pub mod llm;
pub mod store;
pub mod tool;
pub mod workflow;
