//! Dispatcher and specialist registry

use std::collections::HashMap;

use tracing::info;

use super::prompts::{BILLING_PROMPT, ESCALATION_PROMPT, ROOT_SYSTEM_PROMPT, TECH_PROMPT};
use super::types::AgentDescriptor;

pub const ROOT_DISPATCHER: &str = "RootDispatcher";
pub const BILLING_AGENT: &str = "BillingAgent";
pub const TECH_SUPPORT_AGENT: &str = "TechSupportAgent";
pub const ESCALATION_AGENT: &str = "EscalationAgent";

/// One dispatcher plus the specialists it can route to
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    dispatcher: AgentDescriptor,
    specialists: HashMap<String, AgentDescriptor>,
}

impl AgentRegistry {
    /// Build a registry; the dispatcher's sub-agents become the specialists' names
    pub fn new(dispatcher: AgentDescriptor, specialists: Vec<AgentDescriptor>) -> Self {
        let mut dispatcher = dispatcher;
        dispatcher.sub_agents = specialists.iter().map(|s| s.name.clone()).collect();

        let specialists = specialists
            .into_iter()
            .map(|s| (s.name.clone(), s))
            .collect();

        Self {
            dispatcher,
            specialists,
        }
    }

    /// The support line: billing, technical support and escalation
    pub fn support_desk(model: &str) -> Self {
        let billing = AgentDescriptor::new(BILLING_AGENT, BILLING_PROMPT, model)
            .with_tools(&["check_balance", "process_payment"]);
        let tech = AgentDescriptor::new(TECH_SUPPORT_AGENT, TECH_PROMPT, model)
            .with_tools(&["run_diagnostics", "check_outage"]);
        let escalation = AgentDescriptor::new(ESCALATION_AGENT, ESCALATION_PROMPT, model)
            .with_tools(&["escalate_to_human"]);
        let root = AgentDescriptor::new(ROOT_DISPATCHER, ROOT_SYSTEM_PROMPT, model);

        let registry = Self::new(root, vec![billing, tech, escalation]);
        info!(
            "Agent registry ready: {} -> {:?}",
            registry.dispatcher.name, registry.dispatcher.sub_agents
        );
        registry
    }

    pub fn dispatcher(&self) -> &AgentDescriptor {
        &self.dispatcher
    }

    /// Look up a specialist by routing key
    pub fn specialist(&self, name: &str) -> Option<&AgentDescriptor> {
        self.specialists.get(name)
    }

    pub fn specialist_names(&self) -> &[String] {
        &self.dispatcher.sub_agents
    }
}
