//! Remote tool catalog and authorization service.
//!
//! The runner only needs a narrow slice of the service: discover tool
//! definitions, check or start a tool authorization, wait for a pending
//! authorization to finish, and execute a tool on behalf of a user.

use crate::error::CatalogError;
use crate::types::ToolDefinition;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod arcade;

pub use arcade::{qualified_tool_name, ArcadeClient};

/// Lookup parameters for [`ToolCatalog::list_tools`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolQuery {
    /// Every tool of each named toolkit is included.
    pub toolkits: Vec<String>,
    /// Individual tools included in addition to the toolkits.
    pub tools: Vec<String>,
    /// Identity the tools will be authorized and executed for.
    pub user_id: String,
    /// Maximum number of definitions returned.
    pub limit: usize,
}

/// Lifecycle state of an authorization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorizationStatus {
    Pending,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl AuthorizationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }
}

/// Answer to an authorization check or status poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationResponse {
    #[serde(default)]
    pub id: Option<String>,
    /// Page the user must visit while the request is pending.
    #[serde(default)]
    pub url: Option<String>,
    pub status: AuthorizationStatus,
}

impl AuthorizationResponse {
    pub fn is_completed(&self) -> bool {
        self.status == AuthorizationStatus::Completed
    }
}

/// Result of a remote tool execution, already reduced to model-facing text.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub value: Value,
    pub error: Option<String>,
}

impl ToolOutput {
    /// Text sent back to the model as the tool result.
    pub fn to_model_text(&self) -> String {
        if let Some(error) = &self.error {
            return format!("tool error: {error}");
        }
        match &self.value {
            Value::String(text) => text.clone(),
            Value::Null => "(no output)".to_string(),
            other => other.to_string(),
        }
    }
}

/// Authorization half of the service; the decision collector needs only this.
#[async_trait]
pub trait AuthorizationService: Send + Sync {
    /// Check whether `user_id` may call `tool_name`, starting a flow if not.
    async fn authorize(
        &self,
        tool_name: &str,
        user_id: &str,
    ) -> Result<AuthorizationResponse, CatalogError>;

    /// Block until the identified authorization completes.
    ///
    /// Any terminal state other than completed is an error.
    async fn wait_for_completion(
        &self,
        authorization_id: &str,
    ) -> Result<AuthorizationResponse, CatalogError>;
}

/// Full tool service used by the chat agent.
#[async_trait]
pub trait ToolCatalog: AuthorizationService {
    /// Discover invocable tool definitions.
    async fn list_tools(&self, query: &ToolQuery) -> Result<Vec<ToolDefinition>, CatalogError>;

    /// Run one tool with JSON input for `user_id`.
    async fn execute(
        &self,
        tool_name: &str,
        input: Value,
        user_id: &str,
    ) -> Result<ToolOutput, CatalogError>;
}
