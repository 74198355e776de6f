//! Escalation to a human agent

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use va_core::{Result, Tool, ToolResult};

/// Opens a support ticket and hands the caller to a human
pub struct EscalateToHumanTool {
    next_ticket: AtomicU64,
}

impl EscalateToHumanTool {
    pub fn new() -> Self {
        Self {
            next_ticket: AtomicU64::new(1),
        }
    }

    fn ticket_id(&self) -> String {
        let seq = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        format!("ESC-{}-{:04}", Utc::now().format("%Y%m%d"), seq)
    }
}

impl Default for EscalateToHumanTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for EscalateToHumanTool {
    fn name(&self) -> &str {
        "escalate_to_human"
    }

    fn description(&self) -> &str {
        "Transfer the caller to a human support agent and open a ticket."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "reason": {
                    "type": "string",
                    "description": "Why the caller needs a human"
                }
            }
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let reason = input["reason"].as_str().unwrap_or("caller request");
        let ticket = self.ticket_id();
        tracing::info!(ticket = %ticket, reason = %reason, "Escalated to human agent");

        Ok(ToolResult::success(format!(
            "I am transferring you to a human support agent now. Your ticket number is {}.",
            ticket
        )))
    }
}
