//! Tool system
//!
//! Domain tools the specialist agents may call by name with JSON arguments.

pub mod definition;
pub mod manager;
pub mod traits;

pub use definition::{SchemaBuilder, ToolDefinition};
pub use manager::ToolManager;
pub use traits::{Tool, ToolResult};
