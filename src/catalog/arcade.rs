//! Arcade HTTP client implementing the catalog traits.

use super::{
    AuthorizationResponse, AuthorizationService, AuthorizationStatus, ToolCatalog, ToolOutput,
    ToolQuery,
};
use crate::config::ArcadeConfig;
use crate::error::CatalogError;
use crate::types::ToolDefinition;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Seconds the service may hold one status long-poll open.
const STATUS_WAIT_SECS: u64 = 45;
/// Extra client-side slack on top of the long-poll window.
const STATUS_WAIT_SLACK_SECS: u64 = 15;

/// Client for the Arcade tool and auth API.
pub struct ArcadeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    /// Overall cap on how long one authorization wait may take.
    auth_deadline: Option<Duration>,
}

#[derive(Deserialize)]
struct FormattedToolPage {
    #[serde(default)]
    items: Vec<ToolDefinition>,
}

#[derive(Deserialize)]
struct ExecuteResponse {
    #[serde(default)]
    output: Option<ExecuteOutput>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize)]
struct ExecuteOutput {
    #[serde(default)]
    value: Value,
    #[serde(default)]
    error: Option<ExecuteOutputError>,
}

#[derive(Deserialize)]
struct ExecuteOutputError {
    message: String,
}

impl ArcadeClient {
    pub fn new(config: &ArcadeConfig, timeout: Duration) -> Self {
        let timeout = timeout.max(Duration::from_secs(STATUS_WAIT_SECS + STATUS_WAIT_SLACK_SECS));
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.trim().to_string(),
            auth_deadline: config.auth_timeout_secs.map(Duration::from_secs),
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key)
    }

    async fn send_json<T: for<'de> Deserialize<'de>>(
        request: reqwest::RequestBuilder,
    ) -> Result<T, CatalogError> {
        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Status(status, body));
        }
        response.json::<T>().await.map_err(CatalogError::from)
    }

    async fn toolkit_definitions(
        &self,
        toolkit: &str,
        query: &ToolQuery,
    ) -> Result<Vec<ToolDefinition>, CatalogError> {
        let limit = query.limit.to_string();
        let page: FormattedToolPage = Self::send_json(self.get("/v1/formatted_tools").query(&[
            ("toolkit", toolkit),
            ("format", "openai"),
            ("limit", limit.as_str()),
            ("user_id", query.user_id.as_str()),
        ]))
        .await?;
        debug!(toolkit, count = page.items.len(), "listed toolkit");
        Ok(page.items)
    }

    async fn tool_definition(
        &self,
        tool: &str,
        query: &ToolQuery,
    ) -> Result<ToolDefinition, CatalogError> {
        let path = format!("/v1/formatted_tools/{}", qualified_tool_name(tool));
        Self::send_json(
            self.get(&path)
                .query(&[("format", "openai"), ("user_id", query.user_id.as_str())]),
        )
        .await
    }

    async fn poll_status(
        &self,
        authorization_id: &str,
    ) -> Result<AuthorizationResponse, CatalogError> {
        let wait = STATUS_WAIT_SECS.to_string();
        Self::send_json(
            self.get("/v1/auth/status")
                .query(&[("id", authorization_id), ("wait", wait.as_str())]),
        )
        .await
    }
}

#[async_trait]
impl AuthorizationService for ArcadeClient {
    async fn authorize(
        &self,
        tool_name: &str,
        user_id: &str,
    ) -> Result<AuthorizationResponse, CatalogError> {
        Self::send_json(self.post("/v1/tools/authorize").json(&json!({
            "tool_name": qualified_tool_name(tool_name),
            "user_id": user_id,
        })))
        .await
    }

    async fn wait_for_completion(
        &self,
        authorization_id: &str,
    ) -> Result<AuthorizationResponse, CatalogError> {
        let started = Instant::now();
        loop {
            let response = self.poll_status(authorization_id).await?;
            let deadline_passed = self
                .auth_deadline
                .is_some_and(|deadline| started.elapsed() >= deadline);
            if let PollStep::Done(response) =
                interpret_poll(authorization_id, response, deadline_passed)?
            {
                return Ok(response);
            }
            debug!(authorization_id, "authorization still pending");
        }
    }
}

#[async_trait]
impl ToolCatalog for ArcadeClient {
    async fn list_tools(&self, query: &ToolQuery) -> Result<Vec<ToolDefinition>, CatalogError> {
        let mut found = Vec::new();
        for toolkit in &query.toolkits {
            found.extend(self.toolkit_definitions(toolkit, query).await?);
        }
        for tool in &query.tools {
            found.push(self.tool_definition(tool, query).await?);
        }
        Ok(dedupe_and_cap(found, query.limit))
    }

    async fn execute(
        &self,
        tool_name: &str,
        input: Value,
        user_id: &str,
    ) -> Result<ToolOutput, CatalogError> {
        let response: ExecuteResponse = Self::send_json(self.post("/v1/tools/execute").json(&json!({
            "tool_name": qualified_tool_name(tool_name),
            "input": input,
            "user_id": user_id,
        })))
        .await?;
        Ok(execute_response_to_output(response))
    }
}

/// Convert the model-facing `Toolkit_Tool` name to the catalog's `Toolkit.Tool`.
pub fn qualified_tool_name(name: &str) -> String {
    if name.contains('.') {
        return name.to_string();
    }
    name.replacen('_', ".", 1)
}

/// Drop repeated tool names, keeping first occurrence, and cap to `limit`.
fn dedupe_and_cap(definitions: Vec<ToolDefinition>, limit: usize) -> Vec<ToolDefinition> {
    let mut seen = HashSet::new();
    definitions
        .into_iter()
        .filter(|def| seen.insert(def.function.name.clone()))
        .take(limit)
        .collect()
}

/// What one status poll means for an ongoing authorization wait.
#[derive(Debug, PartialEq)]
enum PollStep {
    Done(AuthorizationResponse),
    Retry,
}

/// Map a status answer to the next step. A pending request past the deadline
/// fails with status `timeout`; failed and unknown statuses fail as reported.
fn interpret_poll(
    authorization_id: &str,
    response: AuthorizationResponse,
    deadline_passed: bool,
) -> Result<PollStep, CatalogError> {
    let status = match response.status {
        AuthorizationStatus::Completed => return Ok(PollStep::Done(response)),
        AuthorizationStatus::Pending if !deadline_passed => return Ok(PollStep::Retry),
        AuthorizationStatus::Pending => "timeout",
        other => other.as_str(),
    };
    Err(CatalogError::AuthorizationFailed {
        id: authorization_id.to_string(),
        status: status.to_string(),
    })
}

fn execute_response_to_output(response: ExecuteResponse) -> ToolOutput {
    let (value, error) = match response.output {
        Some(output) => (output.value, output.error.map(|e| e.message)),
        None => (Value::Null, None),
    };
    let error = error.or_else(|| {
        (response.success == Some(false)).then(|| {
            format!(
                "execution failed with status `{}`",
                response.status.as_deref().unwrap_or("unknown")
            )
        })
    });
    ToolOutput { value, error }
}
