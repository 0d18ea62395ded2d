//! Built-in tools shipped with the engine.
//!
//! - `data`: deterministic object/array manipulation
//! - `text`: deterministic text processing
//! - `llm`: prompt-driven tools backed by the chat client

pub mod data;
pub mod llm;
pub mod text;

use std::sync::Arc;

use toolflow_types::error::EngineError;

use crate::tool::registry::ToolRegistry;
use crate::tool::Tool;

/// Register every built-in tool into a registry.
///
/// Idempotent: a tool whose id and version are already registered is left
/// untouched, so a caller-provided override keeps precedence.
pub fn register_builtin_tools(registry: &ToolRegistry) -> Result<(), EngineError> {
    let tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(data::DataMapTool::new()),
        Arc::new(data::DataFilterTool::new()),
        Arc::new(data::DataMergeTool::new()),
        Arc::new(data::DataSelectTool::new()),
        Arc::new(data::DataTransformTool::new()),
        Arc::new(text::TextFormatTool::new()),
        Arc::new(text::TextSplitTool::new()),
        Arc::new(text::TextJoinTool::new()),
        Arc::new(text::TextReplaceTool::new()),
        Arc::new(text::TextTemplateTool::new()),
        Arc::new(text::TextStatsTool::new()),
        Arc::new(text::JsonTool::new()),
        Arc::new(llm::SummarizeTool::new()),
        Arc::new(llm::TranslateTool::new()),
        Arc::new(llm::ExtractTool::new()),
        Arc::new(llm::AnalyzeTool::new()),
        Arc::new(llm::GenerateTool::new()),
        Arc::new(llm::VisionExtractTool::new()),
    ];

    for tool in tools {
        let def = tool.definition();
        if registry.exists(&def.tool_id, Some(&def.version)) {
            continue;
        }
        registry.register(tool)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILTIN_IDS: [&str; 18] = [
        "data.map",
        "data.filter",
        "data.merge",
        "data.select",
        "data.transform",
        "text.format",
        "text.split",
        "text.join",
        "text.replace",
        "text.template",
        "text.stats",
        "text.json",
        "llm.summarize",
        "llm.translate",
        "llm.extract",
        "llm.analyze",
        "llm.generate",
        "llm.vision_extract",
    ];

    #[test]
    fn test_all_builtins_registered() {
        let registry = ToolRegistry::new();
        register_builtin_tools(&registry).unwrap();

        for tool_id in BUILTIN_IDS {
            assert!(registry.exists(tool_id, None), "missing {tool_id}");
            assert!(registry.exists(tool_id, Some("1.0.0")));
        }

        assert_eq!(
            registry.categories(),
            vec!["data".to_string(), "llm".to_string(), "text".to_string()]
        );
    }

    #[test]
    fn test_registering_twice_keeps_existing_tools() {
        let registry = ToolRegistry::new();
        register_builtin_tools(&registry).unwrap();

        let before = Arc::as_ptr(&registry.get("data.map", None).unwrap()) as *const ();
        register_builtin_tools(&registry).unwrap();
        let after = Arc::as_ptr(&registry.get("data.map", None).unwrap()) as *const ();

        // The second pass must not replace already-registered instances.
        assert_eq!(before, after);
        assert_eq!(registry.list_all().len(), BUILTIN_IDS.len());
    }
}
