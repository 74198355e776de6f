//! Agent descriptors

use serde::{Deserialize, Serialize};

/// Immutable description of one agent.
///
/// The name doubles as the routing key the dispatcher transfers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub name: String,
    pub instruction: String,
    pub model: String,
    /// Names of the tools this agent may call
    #[serde(default)]
    pub tools: Vec<String>,
    /// Agents this agent may transfer to
    #[serde(default)]
    pub sub_agents: Vec<String>,
}

impl AgentDescriptor {
    pub fn new(
        name: impl Into<String>,
        instruction: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
            model: model.into(),
            tools: Vec::new(),
            sub_agents: Vec::new(),
        }
    }

    pub fn with_tools(mut self, tools: &[&str]) -> Self {
        self.tools = tools.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_sub_agents(mut self, agents: &[&str]) -> Self {
        self.sub_agents = agents.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Fresh per-turn instance with the caller's words appended to the instruction
    pub fn for_input(&self, user_text: &str) -> Self {
        Self {
            instruction: format!("{}\n\nUSER INPUT: {}", self.instruction, user_text),
            ..self.clone()
        }
    }

    /// Whether this agent routes rather than answers
    pub fn is_dispatcher(&self) -> bool {
        !self.sub_agents.is_empty()
    }
}
