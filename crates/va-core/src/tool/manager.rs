//! Tool manager for registering and executing tools

use std::collections::HashMap;
use std::sync::Arc;

use crate::llm::ToolDefinition;
use crate::tool::Tool;

/// Static name -> tool registry
pub struct ToolManager {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolManager {
    /// Create a new empty tool manager
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Definitions for the named tools, in the order given; unknown names are skipped
    pub fn definitions_for<S: AsRef<str>>(&self, names: &[S]) -> Vec<ToolDefinition> {
        names
            .iter()
            .filter_map(|name| self.tools.get(name.as_ref()))
            .map(|t| ToolDefinition::new(t.name(), t.description(), t.input_schema()))
            .collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if no tools are registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get all registered tool names
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use crate::tool::ToolResult;
    use async_trait::async_trait;
    use serde_json::{Value as JsonValue, json};

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the text argument"
        }

        fn input_schema(&self) -> JsonValue {
            json!({"type": "object", "properties": {"text": {"type": "string"}}})
        }

        async fn execute(&self, input: JsonValue) -> Result<ToolResult> {
            Ok(ToolResult::success(input["text"].as_str().unwrap_or_default()))
        }
    }

    #[tokio::test]
    async fn test_register_and_get() {
        let mut manager = ToolManager::new();
        manager.register(Arc::new(EchoTool));
        assert_eq!(manager.len(), 1);

        let tool = manager.get("echo").unwrap();
        let result = tool.execute(json!({"text": "hi"})).await.unwrap();
        assert_eq!(result.output, "hi");
    }

    #[test]
    fn test_unknown_tool() {
        let manager = ToolManager::new();
        assert!(manager.get("missing").is_none());
        assert!(manager.is_empty());
    }

    #[test]
    fn test_definitions_for_skips_unknown() {
        let mut manager = ToolManager::new();
        manager.register(Arc::new(EchoTool));

        let defs = manager.definitions_for(&["missing", "echo"]);
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
    }
}
