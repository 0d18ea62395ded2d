//! Tool registry: versioned lookup of registered tools.
//!
//! Two concurrent indexes are maintained: tool id to the latest registered
//! version, and (tool id, version) to an exact version. A registry instance
//! is injected wherever tools are resolved; there is no global singleton.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use toolflow_types::error::{EngineError, ErrorCode};
use toolflow_types::tool::ToolDefinition;

use crate::tool::Tool;

/// Concurrent registry of tools, indexed by id and by (id, version).
#[derive(Default)]
pub struct ToolRegistry {
    latest: DashMap<String, Arc<dyn Tool>>,
    versioned: DashMap<(String, String), Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. The tool becomes the latest for its id and is also
    /// reachable under its exact version. Re-registering the same
    /// (id, version) replaces the previous entry.
    pub fn register(&self, tool: Arc<dyn Tool>) -> Result<(), EngineError> {
        let def = tool.definition();
        if def.tool_id.is_empty() {
            return Err(EngineError::new(
                ErrorCode::InternalError,
                "Cannot register a tool with an empty tool_id",
            ));
        }
        debug!(tool_id = %def.tool_id, version = %def.version, "registering tool");
        self.versioned
            .insert((def.tool_id.clone(), def.version.clone()), Arc::clone(&tool));
        self.latest.insert(def.tool_id.clone(), tool);
        Ok(())
    }

    /// Resolve a tool by id, optionally pinned to an exact version.
    ///
    /// Fails with `TOOL_NOT_FOUND` when the id is unknown or the requested
    /// version was never registered.
    pub fn get(&self, tool_id: &str, version: Option<&str>) -> Result<Arc<dyn Tool>, EngineError> {
        let found = match version {
            Some(v) => self
                .versioned
                .get(&(tool_id.to_string(), v.to_string()))
                .map(|entry| Arc::clone(entry.value())),
            None => self.latest.get(tool_id).map(|entry| Arc::clone(entry.value())),
        };
        found.ok_or_else(|| {
            let mut err = EngineError::new(
                ErrorCode::ToolNotFound,
                format!("Tool '{tool_id}' not found"),
            )
            .with_detail("tool_id", tool_id);
            if let Some(v) = version {
                err = err.with_detail("version", v);
            }
            err
        })
    }

    /// Whether a tool id is registered, optionally at an exact version.
    pub fn exists(&self, tool_id: &str, version: Option<&str>) -> bool {
        match version {
            Some(v) => self
                .versioned
                .contains_key(&(tool_id.to_string(), v.to_string())),
            None => self.latest.contains_key(tool_id),
        }
    }

    /// Definitions of all latest-version tools, sorted by tool id.
    pub fn list_all(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self
            .latest
            .iter()
            .map(|entry| entry.value().definition().clone())
            .collect();
        defs.sort_by(|a, b| a.tool_id.cmp(&b.tool_id));
        defs
    }

    /// Definitions of latest-version tools in one category, sorted by id.
    pub fn list_by_category(&self, category: &str) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self
            .latest
            .iter()
            .filter(|entry| entry.value().definition().category == category)
            .map(|entry| entry.value().definition().clone())
            .collect();
        defs.sort_by(|a, b| a.tool_id.cmp(&b.tool_id));
        defs
    }

    /// Distinct categories across registered tools, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut cats: Vec<String> = self
            .latest
            .iter()
            .map(|entry| entry.value().definition().category.clone())
            .collect();
        cats.sort();
        cats.dedup();
        cats
    }

    /// Remove all registered tools. Intended for tests.
    pub fn clear(&self) {
        self.latest.clear();
        self.versioned.clear();
    }
}
