//! Network tools: line diagnostics and outage lookup

use async_trait::async_trait;
use serde_json::{Value, json};
use va_core::{Result, Tool, ToolResult};

/// Runs a line check on the customer's connection
pub struct RunDiagnosticsTool;

impl RunDiagnosticsTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RunDiagnosticsTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for RunDiagnosticsTool {
    fn name(&self) -> &str {
        "run_diagnostics"
    }

    fn description(&self) -> &str {
        "Run a remote line check on the customer's internet connection."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "issue": {
                    "type": "string",
                    "description": "Short description of the problem, for example 'slow speed' or 'no connection'"
                }
            }
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let issue = input["issue"].as_str().unwrap_or("").to_lowercase();
        tracing::debug!(issue = %issue, "Running line diagnostics");

        let advice = if issue.contains("slow") || issue.contains("speed") {
            "Your line is active but the speed is below normal. Please restart your router and move closer to it."
        } else if issue.contains("wifi") || issue.contains("wi-fi") {
            "Your line is active. Please restart your router and reconnect to the wifi network."
        } else {
            "Your line is active and the signal is stable. Please restart your router and check again."
        };

        Ok(ToolResult::success(format!("Diagnostics complete. {}", advice)))
    }
}

/// Checks for known outages
pub struct CheckOutageTool {
    affected_areas: Vec<String>,
}

impl CheckOutageTool {
    pub fn new(affected_areas: Vec<String>) -> Self {
        Self { affected_areas }
    }

    fn is_affected(&self, area: &str) -> bool {
        let area = area.trim().to_lowercase();
        self.affected_areas
            .iter()
            .any(|a| a.to_lowercase() == area)
    }
}

#[async_trait]
impl Tool for CheckOutageTool {
    fn name(&self) -> &str {
        "check_outage"
    }

    fn description(&self) -> &str {
        "Check whether there is a known service outage, optionally in a specific area."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "area": {
                    "type": "string",
                    "description": "Area or locality the customer is in"
                }
            }
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let area = input["area"].as_str().map(str::trim).filter(|a| !a.is_empty());

        let output = match area {
            Some(area) if self.is_affected(area) => format!(
                "There is a known outage in {}. Our engineers are working on it and service should be restored soon.",
                area
            ),
            Some(area) => format!("There is no outage reported in {}.", area),
            None if self.affected_areas.is_empty() => {
                "There are no reported outages at the moment.".to_string()
            }
            None => format!(
                "There are outages reported in {}.",
                self.affected_areas.join(", ")
            ),
        };

        Ok(ToolResult::success(output))
    }
}
