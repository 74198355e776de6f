//! Agent runtime seam
//!
//! Running an agent yields a finite, non-restartable stream of [`AgentEvent`]s.
//! The turn executor consumes it; the language model behind it is opaque.

mod llm;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value as JsonValue;

use crate::Result;
use crate::agents::AgentDescriptor;
use crate::session::Session;

pub use llm::{LlmAgentRuntime, TRANSFER_TOOL};

/// One event produced while an agent runs
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// Spoken text
    Text(String),
    /// Request to call a tool with keyword arguments
    ToolCall { name: String, args: JsonValue },
    /// Routing decision: hand the turn to the named agent
    Transfer { agent_name: String },
}

impl AgentEvent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn tool_call(name: impl Into<String>, args: JsonValue) -> Self {
        Self::ToolCall {
            name: name.into(),
            args,
        }
    }

    pub fn transfer(agent_name: impl Into<String>) -> Self {
        Self::Transfer {
            agent_name: agent_name.into(),
        }
    }
}

/// Event stream returned by [`AgentRuntime::run`]
pub type EventStream = BoxStream<'static, Result<AgentEvent>>;

/// Everything one agent invocation needs besides the agent itself
#[derive(Debug, Clone)]
pub struct RunContext {
    pub invocation_id: String,
    pub session: Session,
    /// The caller's words for this turn
    pub user_text: String,
}

impl RunContext {
    pub fn new(session: Session, user_text: impl Into<String>) -> Self {
        Self {
            invocation_id: uuid::Uuid::new_v4().to_string(),
            session,
            user_text: user_text.into(),
        }
    }
}

/// Executes agents
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Start running `agent`; errors here or inside the stream mean the run failed
    async fn run(&self, agent: &AgentDescriptor, ctx: &RunContext) -> Result<EventStream>;
}
