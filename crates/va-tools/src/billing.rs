//! Billing tools: balance lookup and payment

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use va_core::{Result, Tool, ToolResult};

/// Amount due on a fresh ledger, in rupees
pub const DEFAULT_BALANCE: f64 = 1245.0;

/// Whole rupees to paise; `None` for amounts that are not finite
pub fn to_paise(rupees: f64) -> Option<i64> {
    let paise = (rupees * 100.0).round();
    (paise.is_finite() && paise.abs() < i64::MAX as f64).then_some(paise as i64)
}

/// Spoken form of an amount: "1245" or "0.10"
pub fn format_rupees(paise: i64) -> String {
    let sign = if paise < 0 { "-" } else { "" };
    let paise = paise.unsigned_abs();
    if paise % 100 == 0 {
        format!("{}{}", sign, paise / 100)
    } else {
        format!("{}{}.{:02}", sign, paise / 100, paise % 100)
    }
}

/// Outstanding amount shared by the billing tools, held in paise
#[derive(Debug, Clone)]
pub struct BillingLedger {
    balance: Arc<Mutex<i64>>,
}

impl BillingLedger {
    /// Open a ledger owing `opening_balance` rupees
    pub fn new(opening_balance: f64) -> Self {
        Self {
            balance: Arc::new(Mutex::new(to_paise(opening_balance).unwrap_or(0))),
        }
    }

    /// Amount due, in paise
    pub async fn balance(&self) -> i64 {
        *self.balance.lock().await
    }

    /// Apply a payment in paise and return the remaining balance in paise.
    ///
    /// The refusal reason is for the logs only; the caller hears the generic
    /// tool failure sentence.
    pub async fn pay(&self, amount: i64) -> std::result::Result<i64, String> {
        if amount <= 0 {
            return Err(format!("non-positive amount {}", amount));
        }

        let mut balance = self.balance.lock().await;
        if amount > *balance {
            return Err(format!("amount {} exceeds balance {}", amount, *balance));
        }
        *balance -= amount;
        Ok(*balance)
    }
}

impl Default for BillingLedger {
    fn default() -> Self {
        Self::new(DEFAULT_BALANCE)
    }
}

/// Reports the amount currently due
pub struct CheckBalanceTool {
    ledger: BillingLedger,
}

impl CheckBalanceTool {
    pub fn new(ledger: BillingLedger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for CheckBalanceTool {
    fn name(&self) -> &str {
        "check_balance"
    }

    fn description(&self) -> &str {
        "Look up the customer's current account balance."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _input: Value) -> Result<ToolResult> {
        let balance = self.ledger.balance().await;
        tracing::debug!(balance_paise = balance, "Balance checked");
        Ok(ToolResult::success(format!(
            "Your current balance is {} rupees.",
            format_rupees(balance)
        )))
    }
}

/// Pays part or all of the amount due
pub struct ProcessPaymentTool {
    ledger: BillingLedger,
}

impl ProcessPaymentTool {
    pub fn new(ledger: BillingLedger) -> Self {
        Self { ledger }
    }

    /// Amount in paise; models sometimes send numbers as strings
    fn parse_amount(input: &Value) -> Option<i64> {
        let rupees = match &input["amount"] {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().trim_start_matches('₹').trim().parse().ok()?,
            _ => return None,
        };
        to_paise(rupees)
    }
}

#[async_trait]
impl Tool for ProcessPaymentTool {
    fn name(&self) -> &str {
        "process_payment"
    }

    fn description(&self) -> &str {
        "Pay an amount in rupees towards the customer's balance."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "amount": {
                    "type": "number",
                    "description": "Amount to pay, in rupees"
                }
            },
            "required": ["amount"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolResult> {
        let amount = Self::parse_amount(&input).ok_or_else(|| {
            va_core::Error::ToolExecution("Missing or invalid 'amount' parameter".to_string())
        })?;

        match self.ledger.pay(amount).await {
            Ok(remaining) => {
                tracing::info!(amount_paise = amount, remaining_paise = remaining, "Payment processed");
                Ok(ToolResult::success(format!(
                    "Your payment of {} rupees has been completed successfully. Your remaining balance is {} rupees.",
                    format_rupees(amount),
                    format_rupees(remaining)
                )))
            }
            Err(reason) => {
                tracing::warn!(amount_paise = amount, "Payment rejected: {}", reason);
                Ok(ToolResult::error(reason))
            }
        }
    }
}
