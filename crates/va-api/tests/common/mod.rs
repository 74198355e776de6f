#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::json;

use va_api::AppState;
use va_core::agents::{BILLING_AGENT, ROOT_DISPATCHER};
use va_core::runtime::EventStream;
use va_core::{
    AgentDescriptor, AgentEvent, AgentRegistry, AgentRuntime, Config, ErrorLog,
    InMemorySessionService, RunContext, SessionService, SessionStore, ToolManager, TurnExecutor,
};

/// Routes every utterance to billing, which checks the balance,
/// unless the caller mentions "mumble" (silent specialist) or "crash".
pub struct BillingDesk;

#[async_trait]
impl AgentRuntime for BillingDesk {
    async fn run(&self, agent: &AgentDescriptor, ctx: &RunContext) -> va_core::Result<EventStream> {
        if ctx.user_text.contains("crash") {
            return Err(va_core::Error::LlmApi("connection reset".into()));
        }

        let events = match agent.name.as_str() {
            ROOT_DISPATCHER => vec![AgentEvent::transfer(BILLING_AGENT)],
            _ if ctx.user_text.contains("mumble") => vec![AgentEvent::text("  ")],
            _ => vec![AgentEvent::tool_call("check_balance", json!({}))],
        };
        Ok(futures::stream::iter(events.into_iter().map(Ok)).boxed())
    }
}

pub struct TestApp {
    pub state: AppState,
    pub dir: tempfile::TempDir,
}

impl TestApp {
    pub fn error_log(&self) -> std::path::PathBuf {
        self.dir.path().join("error.log")
    }
}

pub fn test_app() -> TestApp {
    test_app_with(Arc::new(InMemorySessionService::new()))
}

pub fn test_app_with(service: Arc<dyn SessionService>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.error_log_path = dir.path().join("error.log").display().to_string();

    let mut tools = ToolManager::new();
    va_tools::register_default_tools(&mut tools);

    let executor = TurnExecutor::new(
        Arc::new(BillingDesk),
        AgentRegistry::support_desk("test-model"),
        Arc::new(tools),
        service.clone(),
        ErrorLog::new(&config.error_log_path),
    );
    let sessions = SessionStore::new(service);

    TestApp {
        state: AppState::new(config, sessions, executor),
        dir,
    }
}

pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
