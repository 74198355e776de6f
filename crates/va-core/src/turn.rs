//! Turn executor
//!
//! Runs one caller utterance through the dispatcher and the chosen
//! specialist and produces the sentence to speak back. Every failure is
//! absorbed into a fixed fallback sentence.

use std::sync::Arc;

use futures::StreamExt;
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::Result;
use crate::agents::{AgentDescriptor, AgentRegistry};
use crate::error_log::ErrorLog;
use crate::llm::Message;
use crate::runtime::{AgentEvent, AgentRuntime, RunContext};
use crate::session::{Session, SessionService};
use crate::tool::ToolManager;

pub const TROUBLE_CONNECTING: &str =
    "I am having trouble connecting to the service. Please try again later.";
pub const NOT_UNDERSTOOD: &str = "Sorry, I could not understand your request.";
pub const HEAVY_TRAFFIC: &str =
    "I am experiencing heavy traffic and cannot process your request right now.";
pub const TOOL_FAILED: &str = "Sorry, there was an error.";

pub struct TurnExecutor {
    runtime: Arc<dyn AgentRuntime>,
    agents: AgentRegistry,
    tools: Arc<ToolManager>,
    sessions: Arc<dyn SessionService>,
    error_log: ErrorLog,
}

impl TurnExecutor {
    pub fn new(
        runtime: Arc<dyn AgentRuntime>,
        agents: AgentRegistry,
        tools: Arc<ToolManager>,
        sessions: Arc<dyn SessionService>,
        error_log: ErrorLog,
    ) -> Self {
        Self {
            runtime,
            agents,
            tools,
            sessions,
            error_log,
        }
    }

    /// Produce the reply for one utterance. May be empty.
    pub async fn execute(&self, user_text: &str, session: &Session) -> String {
        let ctx = RunContext::new(session.clone(), user_text);

        let target = match self.route(&ctx).await {
            Ok(Some(name)) => name,
            Ok(None) => {
                let err = crate::Error::Runtime("dispatcher ended without a transfer".into());
                self.error_log.record("Root agent", &err).await;
                return TROUBLE_CONNECTING.to_string();
            }
            Err(e) => {
                self.error_log.record("Root agent", &e).await;
                return TROUBLE_CONNECTING.to_string();
            }
        };

        let Some(specialist) = self.agents.specialist(&target) else {
            info!("Dispatcher chose unknown agent: {}", target);
            return NOT_UNDERSTOOD.to_string();
        };

        let reply = match self.run_specialist(specialist, &ctx).await {
            Ok(reply) => reply,
            Err(e) => {
                self.error_log.record("Selected agent", &e).await;
                return HEAVY_TRAFFIC.to_string();
            }
        };

        self.record_history(session, user_text, &reply).await;
        reply
    }

    /// Run the dispatcher until it names a specialist
    async fn route(&self, ctx: &RunContext) -> Result<Option<String>> {
        let dispatcher = self.agents.dispatcher().for_input(&ctx.user_text);
        let mut events = self.runtime.run(&dispatcher, ctx).await?;

        while let Some(event) = events.next().await {
            if let AgentEvent::Transfer { agent_name } = event? {
                info!("Routed to agent: {}", agent_name);
                return Ok(Some(agent_name));
            }
        }
        Ok(None)
    }

    async fn run_specialist(&self, specialist: &AgentDescriptor, ctx: &RunContext) -> Result<String> {
        let agent = specialist.for_input(&ctx.user_text);
        let mut events = self.runtime.run(&agent, ctx).await?;
        let mut reply = String::new();

        while let Some(event) = events.next().await {
            match event? {
                AgentEvent::Text(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        reply.push_str(text);
                        reply.push(' ');
                    }
                }
                AgentEvent::ToolCall { name, args } => {
                    if let Some(output) = self.call_tool(&name, args).await {
                        reply.push_str(&output);
                        reply.push(' ');
                    }
                }
                AgentEvent::Transfer { agent_name } => {
                    debug!("{} tried to transfer to {}; ignored", agent.name, agent_name);
                }
            }
        }

        Ok(reply.trim().to_string())
    }

    /// Invoke a tool; `None` means it is not registered
    async fn call_tool(&self, name: &str, args: JsonValue) -> Option<String> {
        let Some(tool) = self.tools.get(name) else {
            warn!("Agent requested unknown tool: {}", name);
            return None;
        };

        debug!("Calling tool {} with {}", name, args);
        match tool.execute(args).await {
            Ok(result) if !result.is_error => Some(result.output.trim().to_string()),
            Ok(result) => {
                tracing::error!("Tool {} failed: {}", name, result.output);
                Some(TOOL_FAILED.to_string())
            }
            Err(e) => {
                tracing::error!("Tool {} failed: {}", name, e);
                Some(TOOL_FAILED.to_string())
            }
        }
    }

    async fn record_history(&self, session: &Session, user_text: &str, reply: &str) {
        let mut messages = vec![Message::user(user_text)];
        if !reply.is_empty() {
            messages.push(Message::assistant(reply));
        }
        if let Err(e) = self.sessions.append_history(&session.id, messages).await {
            warn!("Failed to record history for session {}: {}", session.id, e);
        }
    }
}
