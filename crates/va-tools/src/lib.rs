//! va-tools: domain tools for the voice desk
//!
//! Billing, network and escalation tools the specialist agents call.

use std::sync::Arc;

use va_core::{ToolManager, ToolsConfig};

pub mod billing;
pub mod escalation;
pub mod network;

pub use billing::{BillingLedger, CheckBalanceTool, ProcessPaymentTool};
pub use escalation::EscalateToHumanTool;
pub use network::{CheckOutageTool, RunDiagnosticsTool};

/// Register the five support tools with default settings
pub fn register_default_tools(manager: &mut ToolManager) {
    register_tools(manager, &ToolsConfig::default());
}

/// Register the five support tools; the billing tools share one ledger
pub fn register_tools(manager: &mut ToolManager, config: &ToolsConfig) {
    let ledger = BillingLedger::new(config.opening_balance);

    manager.register(Arc::new(CheckBalanceTool::new(ledger.clone())));
    manager.register(Arc::new(ProcessPaymentTool::new(ledger)));
    manager.register(Arc::new(RunDiagnosticsTool::new()));
    manager.register(Arc::new(CheckOutageTool::new(config.outage_areas.clone())));
    manager.register(Arc::new(EscalateToHumanTool::new()));
}
