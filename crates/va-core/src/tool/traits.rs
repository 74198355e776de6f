//! Tool trait definition

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::Result;

/// Tool execution result
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// Text the tool produced
    pub output: String,
    /// Whether the tool reported a failure
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            is_error: false,
        }
    }

    /// Create an error tool result
    pub fn error(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            is_error: true,
        }
    }
}

impl std::fmt::Display for ToolResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.output)
    }
}

/// A named callable an agent may invoke.
///
/// `execute` receives the keyword arguments the model supplied as a JSON
/// object. Returning `Err` (or an error result) counts as a failed call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model uses to call the tool
    fn name(&self) -> &str;

    /// Description shown to the model
    fn description(&self) -> &str;

    /// JSON schema of the keyword arguments
    fn input_schema(&self) -> JsonValue;

    /// Execute the tool with the given arguments
    async fn execute(&self, input: JsonValue) -> Result<ToolResult>;
}
