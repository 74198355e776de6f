//! Configuration management
//!
//! Settings are resolved in this order:
//! 1. Environment variables
//! 2. `voice-desk.toml` in the working directory
//! 3. Defaults
//!
//! `${VAR_NAME}` inside the TOML file is replaced with the variable's value.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Error;

/// Default config file name looked up by [`Config::load`]
pub const CONFIG_FILE: &str = "voice-desk.toml";

/// LLM Provider type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Anthropic Claude Messages API
    #[default]
    Claude,
    /// OpenAI-compatible chat completions (OpenAI, Gemini, GLM, ...)
    OpenAi,
}

impl LlmProvider {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "openai" | "gemini" | "glm" | "zai" | "minimax" => LlmProvider::OpenAi,
            _ => LlmProvider::Claude,
        }
    }
}

/// LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key
    #[serde(default)]
    pub api_key: String,

    /// Model used by every agent
    #[serde(default = "default_model")]
    pub model: String,

    /// API provider
    #[serde(default)]
    pub provider: LlmProvider,

    /// Base URL (optional, for custom endpoints)
    pub base_url: Option<String>,

    /// Max tokens per agent call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            provider: LlmProvider::Claude,
            base_url: None,
            max_tokens: default_max_tokens(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listening port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; permissive when unset
    #[serde(default)]
    pub allowed_origins: Option<Vec<String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            allowed_origins: None,
        }
    }
}

/// Session provider backend
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    #[default]
    Memory,
    Sqlite,
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub backend: SessionBackend,

    /// SQLite file used by the `sqlite` backend
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Number of history messages sent to the specialist as context (0 = none)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::Memory,
            db_path: default_db_path(),
            history_limit: default_history_limit(),
        }
    }
}

/// Twilio voice settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelephonyConfig {
    /// Language tag used for speech gathering
    #[serde(default = "default_language")]
    pub language: String,

    /// Seconds Twilio waits for the caller to start speaking
    #[serde(default = "default_gather_timeout")]
    pub gather_timeout_secs: u32,
}

impl Default for TelephonyConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            gather_timeout_secs: default_gather_timeout(),
        }
    }
}

/// Domain tool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Amount due on the billing ledger at startup, in rupees
    #[serde(default = "default_opening_balance")]
    pub opening_balance: f64,

    /// Areas with a known service outage
    #[serde(default)]
    pub outage_areas: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            opening_balance: default_opening_balance(),
            outage_areas: Vec::new(),
        }
    }
}

/// Main configuration for voice-desk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub telephony: TelephonyConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    /// File receiving the last turn failure
    #[serde(default = "default_error_log_path")]
    pub error_log_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            server: ServerConfig::default(),
            session: SessionConfig::default(),
            telephony: TelephonyConfig::default(),
            tools: ToolsConfig::default(),
            error_log_path: default_error_log_path(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u64 {
    1024
}

fn default_port() -> u16 {
    8000
}

fn default_db_path() -> String {
    "data/voice-desk.db".to_string()
}

fn default_history_limit() -> usize {
    20
}

fn default_language() -> String {
    "en-IN".to_string()
}

fn default_gather_timeout() -> u32 {
    4
}

fn default_opening_balance() -> f64 {
    1245.0
}

fn default_error_log_path() -> String {
    "error.log".to_string()
}

impl Config {
    /// Replace `${VAR_NAME}` with the environment value (empty when unset)
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let toml_content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut cfg = Self::from_toml_str(&toml_content)?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Parse configuration from TOML text (env vars expanded, no overrides)
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let expanded = Self::expand_env_vars(content);
        toml::from_str(&expanded)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Load `.env`, then `voice-desk.toml` if present, else environment only
    pub fn load() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }

        Ok(Self::from_env())
    }

    /// Load configuration from environment variables over defaults
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var("LLM_API_KEY") {
            self.llm.api_key = api_key;
        }

        // Only take the model from the environment if it is non-empty
        let model = std::env::var("LLM_MODEL")
            .ok()
            .filter(|m| !m.is_empty())
            .or_else(|| std::env::var("GOOGLE_GENAI_MODEL").ok().filter(|m| !m.is_empty()));
        if let Some(model) = model {
            self.llm.model = model;
        }

        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            if !provider.is_empty() {
                self.llm.provider = LlmProvider::parse(&provider);
            }
        }

        if let Ok(base_url) = std::env::var("LLM_BASE_URL") {
            if !base_url.is_empty() {
                self.llm.base_url = Some(base_url);
            }
        }

        if let Ok(port) = std::env::var("PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Ok(origins) = std::env::var("ALLOWED_ORIGINS") {
            self.server.allowed_origins =
                Some(origins.split(',').map(|s| s.trim().to_string()).collect());
        }

        if let Ok(backend) = std::env::var("SESSION_BACKEND") {
            self.session.backend = match backend.to_lowercase().as_str() {
                "sqlite" => SessionBackend::Sqlite,
                _ => SessionBackend::Memory,
            };
        }
        if let Ok(path) = std::env::var("SESSION_DB_PATH") {
            self.session.db_path = path;
        }

        if let Ok(language) = std::env::var("TWILIO_LANGUAGE") {
            if !language.is_empty() {
                self.telephony.language = language;
            }
        }

        if let Ok(areas) = std::env::var("OUTAGE_AREAS") {
            self.tools.outage_areas = areas
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(path) = std::env::var("ERROR_LOG_PATH") {
            if !path.is_empty() {
                self.error_log_path = path;
            }
        }
    }
}
