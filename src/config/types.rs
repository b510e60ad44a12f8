//! Configuration data model.
//!
//! Every section deserializes with defaults so a partial TOML file (or none at
//! all) yields a complete [`Config`].

use serde::Deserialize;

use super::defaults::{
    DEFAULT_API_BASE_URL, DEFAULT_API_TIMEOUT_SECS, DEFAULT_ARCADE_BASE_URL, DEFAULT_SESSION_ID,
    DEFAULT_SYSTEM_PROMPT, DEFAULT_TOOLKIT, DEFAULT_TOOL_LIMIT,
};

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub agent: AgentConfig,
    pub tools: ToolsConfig,
    pub arcade: ArcadeConfig,
    pub api: ApiConfig,
    pub display: DisplayConfig,
}

/// Agent behavior under `[agent]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model identifier sent to the chat API. Required.
    pub model: String,
    pub system_prompt: String,
    /// Conversation thread id binding every turn to one checkpoint.
    pub session_id: String,
    /// Optional cap on suspension rounds per turn; unbounded when absent.
    pub max_rounds: Option<u32>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            session_id: DEFAULT_SESSION_ID.to_string(),
            max_rounds: None,
        }
    }
}

/// Tool discovery and gating under `[tools]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Toolkits whose tools are all exposed to the model.
    pub toolkits: Vec<String>,
    /// Individual tools exposed in addition to the toolkits.
    pub tools: Vec<String>,
    /// Maximum number of tool definitions fetched from the catalog.
    pub limit: usize,
    /// Tools that always need an operator's explicit approval.
    pub require_approval: Vec<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            toolkits: vec![DEFAULT_TOOLKIT.to_string()],
            tools: Vec::new(),
            limit: DEFAULT_TOOL_LIMIT,
            require_approval: Vec::new(),
        }
    }
}

/// Tool catalog connection under `[arcade]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    pub base_url: String,
    pub api_key: String,
    /// Identity tools are authorized for. Required.
    pub user_id: String,
    /// Give up waiting on an authorization after this many seconds.
    pub auth_timeout_secs: Option<u64>,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ARCADE_BASE_URL.to_string(),
            api_key: String::new(),
            user_id: String::new(),
            auth_timeout_secs: None,
        }
    }
}

/// Chat-completions endpoint under `[api]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: String::new(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

/// Terminal output under `[display]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}
