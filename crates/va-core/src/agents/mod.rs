//! Agent definitions
//!
//! ```text
//!                  RootDispatcher
//!        ┌──────────────┼───────────────┐
//!        ▼              ▼               ▼
//!   BillingAgent  TechSupportAgent  EscalationAgent
//!   check_balance run_diagnostics   escalate_to_human
//!   process_payment check_outage
//! ```
//!
//! The dispatcher only transfers; each specialist sees only its own tools.

pub mod prompts;
pub mod registry;
pub mod types;

pub use registry::{
    AgentRegistry, BILLING_AGENT, ESCALATION_AGENT, ROOT_DISPATCHER, TECH_SUPPORT_AGENT,
};
pub use types::AgentDescriptor;
