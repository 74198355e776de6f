//! Tool definition helpers

use serde_json::{Value as JsonValue, json};

pub use crate::llm::ToolDefinition;

/// Helpers for building tool input schemas
pub struct SchemaBuilder;

impl SchemaBuilder {
    /// Object schema from `(name, type, description, required)` tuples
    pub fn object_schema(properties: &[(&str, &str, &str, bool)]) -> JsonValue {
        let props: serde_json::Map<String, JsonValue> = properties
            .iter()
            .map(|(name, type_str, desc, _)| {
                (
                    name.to_string(),
                    json!({"type": type_str, "description": desc}),
                )
            })
            .collect();

        let required: Vec<&str> = properties
            .iter()
            .filter(|(_, _, _, required)| *required)
            .map(|(name, _, _, _)| *name)
            .collect();

        json!({
            "type": "object",
            "properties": props,
            "required": required
        })
    }

    /// String enum schema
    pub fn string_enum(description: &str, values: &[&str]) -> JsonValue {
        json!({
            "type": "string",
            "description": description,
            "enum": values
        })
    }
}
