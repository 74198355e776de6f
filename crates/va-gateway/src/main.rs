//! voice-desk: voice support desk server
//!
//! Usage:
//!   voice-desk            - Start the webhook server
//!   voice-desk --help     - Show help
//!   voice-desk --version  - Show version

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use va_api::AppState;
use va_core::{
    AgentRegistry, Config, ErrorLog, InMemorySessionService, LlmAgentRuntime, LlmClient,
    SessionBackend, SessionService, SessionStore, SqliteSessionService, ToolManager, TurnExecutor,
};
use va_tools::register_tools;

enum RunMode {
    Server,
    Help,
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match parse_args() {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("voice-desk {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Server => {}
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting voice-desk...");
    tracing::info!("Model: {} ({:?})", config.llm.model, config.llm.provider);
    if config.llm.api_key.is_empty() {
        tracing::warn!("LLM_API_KEY is not set; every turn will fall back to an apology");
    }

    let state = build_state(config)?;
    va_api::start_server(state).await?;

    tracing::info!("voice-desk stopped");
    Ok(())
}

fn parse_args() -> RunMode {
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }
    RunMode::Server
}

fn print_help() {
    println!("voice-desk - voice customer support desk");
    println!();
    println!("Usage:");
    println!("  voice-desk            Start the webhook server");
    println!("  voice-desk --help     Show this help message");
    println!("  voice-desk --version  Show version");
    println!();
    println!("Configuration is read from voice-desk.toml when present, then the environment:");
    println!("  LLM_API_KEY          API key for the language model");
    println!("  LLM_MODEL            Model name (falls back to GOOGLE_GENAI_MODEL)");
    println!("  LLM_PROVIDER         Provider: claude or openai (default: claude)");
    println!("  LLM_BASE_URL         Custom API endpoint");
    println!("  PORT                 HTTP port (default: 8000)");
    println!("  SESSION_BACKEND      memory or sqlite (default: memory)");
    println!("  SESSION_DB_PATH      SQLite file (default: data/voice-desk.db)");
    println!("  OUTAGE_AREAS         Comma-separated areas with a known outage");
    println!("  ERROR_LOG_PATH       File holding the last turn failure (default: error.log)");
}

fn session_service(config: &Config) -> anyhow::Result<Arc<dyn SessionService>> {
    Ok(match config.session.backend {
        SessionBackend::Memory => Arc::new(InMemorySessionService::new()),
        SessionBackend::Sqlite => {
            tracing::info!("Persisting sessions to {}", config.session.db_path);
            Arc::new(
                SqliteSessionService::new(&config.session.db_path)
                    .map_err(|e| anyhow::anyhow!("Failed to open session database: {}", e))?,
            )
        }
    })
}

/// Wire the tools, agents, runtime and session store together
fn build_state(config: Config) -> anyhow::Result<AppState> {
    let mut tools = ToolManager::new();
    register_tools(&mut tools, &config.tools);
    tracing::info!("Registered {} tools: {:?}", tools.len(), tools.tool_names());
    let tools = Arc::new(tools);

    let client = LlmClient::new(&config.llm)
        .map_err(|e| anyhow::anyhow!("Failed to create LLM client: {}", e))?;
    let runtime = LlmAgentRuntime::new(client, Arc::clone(&tools), config.session.history_limit);

    let service = session_service(&config)?;
    let executor = TurnExecutor::new(
        Arc::new(runtime),
        AgentRegistry::support_desk(&config.llm.model),
        tools,
        Arc::clone(&service),
        ErrorLog::new(&config.error_log_path),
    );
    let sessions = SessionStore::new(service);

    Ok(AppState::new(config, sessions, executor))
}
