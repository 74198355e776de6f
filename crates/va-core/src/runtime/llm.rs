//! Agent runtime backed by the LLM client

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tracing::{debug, warn};

use super::{AgentEvent, AgentRuntime, EventStream, RunContext};
use crate::Result;
use crate::agents::AgentDescriptor;
use crate::llm::{LlmClient, MessageContent, MessagesRequestBuilder, ToolChoice, ToolDefinition};
use crate::tool::{SchemaBuilder, ToolManager};

/// Tool the dispatcher calls to pick a specialist
pub const TRANSFER_TOOL: &str = "transfer_to_agent";

/// Runs each agent as a single model call and replays the response as events
pub struct LlmAgentRuntime {
    client: LlmClient,
    tools: Arc<ToolManager>,
    history_limit: usize,
}

impl LlmAgentRuntime {
    pub fn new(client: LlmClient, tools: Arc<ToolManager>, history_limit: usize) -> Self {
        Self {
            client,
            tools,
            history_limit,
        }
    }

    fn transfer_tool(agent: &AgentDescriptor) -> ToolDefinition {
        let targets: Vec<&str> = agent.sub_agents.iter().map(String::as_str).collect();
        ToolDefinition::new(
            TRANSFER_TOOL,
            "Hand the conversation to the agent best suited to the caller's request.",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "agent_name": SchemaBuilder::string_enum("Agent to transfer to", &targets)
                },
                "required": ["agent_name"]
            }),
        )
    }

    fn to_event(content: MessageContent) -> Option<AgentEvent> {
        match content {
            MessageContent::Text { text } => Some(AgentEvent::Text(text)),
            MessageContent::ToolUse { name, input, .. } if name == TRANSFER_TOOL => {
                match input.get("agent_name").and_then(|v| v.as_str()) {
                    Some(agent_name) => Some(AgentEvent::transfer(agent_name)),
                    None => {
                        warn!("transfer_to_agent called without agent_name: {}", input);
                        None
                    }
                }
            }
            MessageContent::ToolUse { name, input, .. } => Some(AgentEvent::ToolCall {
                name,
                args: input,
            }),
            MessageContent::ToolResult { .. } => None,
        }
    }
}

#[async_trait]
impl AgentRuntime for LlmAgentRuntime {
    async fn run(&self, agent: &AgentDescriptor, ctx: &RunContext) -> Result<EventStream> {
        let mut builder = MessagesRequestBuilder::new(agent.model.clone())
            .system(agent.instruction.clone())
            .max_tokens(self.client.max_tokens());

        if agent.is_dispatcher() {
            builder = builder
                .tool(Self::transfer_tool(agent))
                .tool_choice(ToolChoice::Any);
        } else {
            for message in ctx.session.recent_history(self.history_limit) {
                builder = builder.message(message.clone());
            }
            for definition in self.tools.definitions_for(&agent.tools) {
                builder = builder.tool(definition);
            }
        }

        let request = builder.user(ctx.user_text.clone()).build();

        debug!(
            invocation_id = %ctx.invocation_id,
            agent = %agent.name,
            "Running agent"
        );

        let response = self.client.messages(request).await?;
        let events: Vec<AgentEvent> = response
            .content
            .into_iter()
            .filter_map(Self::to_event)
            .collect();

        Ok(futures::stream::iter(events.into_iter().map(Ok)).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transfer_tool_lists_sub_agents() {
        let root = AgentDescriptor::new("RootDispatcher", "route", "m")
            .with_sub_agents(&["BillingAgent", "TechSupportAgent"]);

        let tool = LlmAgentRuntime::transfer_tool(&root);
        assert_eq!(tool.name, TRANSFER_TOOL);
        assert_eq!(
            tool.input_schema["properties"]["agent_name"]["enum"],
            json!(["BillingAgent", "TechSupportAgent"])
        );
    }

    #[test]
    fn test_content_to_events() {
        let transfer = MessageContent::ToolUse {
            id: "t1".to_string(),
            name: TRANSFER_TOOL.to_string(),
            input: json!({"agent_name": "BillingAgent"}),
        };
        assert_eq!(
            LlmAgentRuntime::to_event(transfer),
            Some(AgentEvent::transfer("BillingAgent"))
        );

        let call = MessageContent::ToolUse {
            id: "t2".to_string(),
            name: "check_balance".to_string(),
            input: json!({}),
        };
        assert_eq!(
            LlmAgentRuntime::to_event(call),
            Some(AgentEvent::tool_call("check_balance", json!({})))
        );

        let text = MessageContent::Text {
            text: "One moment.".to_string(),
        };
        assert_eq!(LlmAgentRuntime::to_event(text), Some(AgentEvent::text("One moment.")));

        let malformed = MessageContent::ToolUse {
            id: "t3".to_string(),
            name: TRANSFER_TOOL.to_string(),
            input: json!({}),
        };
        assert_eq!(LlmAgentRuntime::to_event(malformed), None);
    }
}
