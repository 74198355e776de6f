//! va-core: voice desk core library
//!
//! Agent definitions and runtime, the turn executor, the LLM client,
//! session management and the tool system.

pub mod agents;
pub mod config;
pub mod error;
pub mod error_log;
pub mod llm;
pub mod runtime;
pub mod session;
pub mod tool;
pub mod turn;

pub use agents::{AgentDescriptor, AgentRegistry};
pub use config::{Config, LlmConfig, LlmProvider, SessionBackend, ToolsConfig};
pub use error::{Error, Result};
pub use error_log::ErrorLog;
pub use llm::{LlmClient, Message, MessageContent, ToolDefinition};
pub use runtime::{AgentEvent, AgentRuntime, EventStream, LlmAgentRuntime, RunContext};
pub use session::{InMemorySessionService, Session, SessionService, SessionStore, SqliteSessionService};
pub use tool::{Tool, ToolManager, ToolResult};
pub use turn::TurnExecutor;
