//! Shared test doubles for the agent, collector, driver, and session tests.
//!
//! Each double records what it was asked so tests can assert on call order
//! without touching a terminal or the network.

use crate::agent::{AgentExecutor, AgentInput, ExecutionStream, RunConfig, StreamEvent};
use crate::api::ModelClient;
use crate::catalog::{
    AuthorizationResponse, AuthorizationService, AuthorizationStatus, ToolCatalog, ToolOutput,
    ToolQuery,
};
use crate::collector::SuspensionResolver;
use crate::decision::Decision;
use crate::error::{ApiError, CatalogError, ExecutionError, FrontendError};
use crate::frontend::Frontend;
use crate::suspension::SuspensionKind;
use crate::types::{
    ChatRequest, ChatResponse, Choice, FunctionCall, Message, ToolCall, ToolDefinition,
};
use crate::ui::render::RenderSink;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Front end and renderer
// ---------------------------------------------------------------------------

/// Front end that replays fixed lines, then reports end of input.
#[derive(Debug, Default)]
pub struct ScriptedFrontend {
    lines: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedFrontend {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: Mutex::new(lines.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts shown so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Frontend for ScriptedFrontend {
    async fn read_line(&self, prompt: &str) -> Result<Option<String>, FrontendError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.lines.lock().unwrap().pop_front())
    }
}

/// One call made against [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Header { model: String, user_id: String },
    AgentMessage { author: String, content: String },
    Activity(String),
    Detail(String),
    ApprovalBlock(String),
    Warn(String),
    Error(String),
    Welcome(String),
    Farewell(String),
}

/// Render sink that keeps every call instead of printing.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<Rendered>>,
}

impl RecordingRenderer {
    pub fn events(&self) -> Vec<Rendered> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: Rendered) {
        self.events.lock().unwrap().push(event);
    }

    fn collect<F>(&self, pick: F) -> Vec<String>
    where
        F: Fn(&Rendered) -> Option<&String>,
    {
        self.events().iter().filter_map(|e| pick(e).cloned()).collect()
    }

    pub fn activities(&self) -> Vec<String> {
        self.collect(|e| match e {
            Rendered::Activity(text) => Some(text),
            _ => None,
        })
    }

    pub fn approval_blocks(&self) -> Vec<String> {
        self.collect(|e| match e {
            Rendered::ApprovalBlock(text) => Some(text),
            _ => None,
        })
    }

    pub fn warnings(&self) -> Vec<String> {
        self.collect(|e| match e {
            Rendered::Warn(text) => Some(text),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<String> {
        self.collect(|e| match e {
            Rendered::Error(text) => Some(text),
            _ => None,
        })
    }

    pub fn farewells(&self) -> Vec<String> {
        self.collect(|e| match e {
            Rendered::Farewell(text) => Some(text),
            _ => None,
        })
    }

    /// Agent message contents in render order.
    pub fn agent_messages(&self) -> Vec<String> {
        self.collect(|e| match e {
            Rendered::AgentMessage { content, .. } => Some(content),
            _ => None,
        })
    }
}

impl RenderSink for RecordingRenderer {
    fn header(&self, model: &str, user_id: &str) {
        self.push(Rendered::Header {
            model: model.into(),
            user_id: user_id.into(),
        });
    }
    fn agent_message(&self, author: &str, content: &str) {
        self.push(Rendered::AgentMessage {
            author: author.into(),
            content: content.into(),
        });
    }
    fn activity(&self, text: &str) {
        self.push(Rendered::Activity(text.into()));
    }
    fn detail(&self, text: &str) {
        self.push(Rendered::Detail(text.into()));
    }
    fn approval_block(&self, text: &str) {
        self.push(Rendered::ApprovalBlock(text.into()));
    }
    fn warn(&self, msg: &str) {
        self.push(Rendered::Warn(msg.into()));
    }
    fn error(&self, msg: &str) {
        self.push(Rendered::Error(msg.into()));
    }
    fn welcome(&self, text: &str) {
        self.push(Rendered::Welcome(text.into()));
    }
    fn farewell(&self, text: &str) {
        self.push(Rendered::Farewell(text.into()));
    }
}

// ---------------------------------------------------------------------------
// Tool catalog and authorization
// ---------------------------------------------------------------------------

/// Authorization service whose waits all succeed or all fail.
#[derive(Debug, Default)]
pub struct StubAuthorization {
    fail: bool,
    waited: Mutex<Vec<String>>,
}

impl StubAuthorization {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Authorization ids waited on, in order.
    pub fn waited(&self) -> Vec<String> {
        self.waited.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthorizationService for StubAuthorization {
    async fn authorize(
        &self,
        _tool_name: &str,
        _user_id: &str,
    ) -> Result<AuthorizationResponse, CatalogError> {
        Ok(completed(None))
    }

    async fn wait_for_completion(
        &self,
        authorization_id: &str,
    ) -> Result<AuthorizationResponse, CatalogError> {
        self.waited.lock().unwrap().push(authorization_id.to_string());
        if self.fail {
            return Err(CatalogError::AuthorizationFailed {
                id: authorization_id.to_string(),
                status: "failed".to_string(),
            });
        }
        Ok(completed(Some(authorization_id)))
    }
}

fn completed(id: Option<&str>) -> AuthorizationResponse {
    AuthorizationResponse {
        id: id.map(str::to_string),
        url: None,
        status: AuthorizationStatus::Completed,
    }
}

/// Catalog where listed tools are already authorized and every other tool
/// answers with one fixed pending authorization.
#[derive(Debug, Default)]
pub struct StubCatalog {
    authorized: HashSet<String>,
    pending_id: String,
    pending_url: String,
    executed: Mutex<Vec<String>>,
}

impl StubCatalog {
    pub fn authorized(tools: &[&str]) -> Self {
        Self {
            authorized: tools.iter().map(|t| t.to_string()).collect(),
            pending_id: "ac_pending".into(),
            ..Self::default()
        }
    }

    pub fn pending_authorization(id: &str, url: &str) -> Self {
        Self {
            pending_id: id.into(),
            pending_url: url.into(),
            ..Self::default()
        }
    }

    /// Tool names executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthorizationService for StubCatalog {
    async fn authorize(
        &self,
        tool_name: &str,
        _user_id: &str,
    ) -> Result<AuthorizationResponse, CatalogError> {
        if self.authorized.contains(tool_name) {
            return Ok(completed(None));
        }
        Ok(AuthorizationResponse {
            id: Some(self.pending_id.clone()),
            url: Some(self.pending_url.clone()),
            status: AuthorizationStatus::Pending,
        })
    }

    async fn wait_for_completion(
        &self,
        authorization_id: &str,
    ) -> Result<AuthorizationResponse, CatalogError> {
        Ok(completed(Some(authorization_id)))
    }
}

#[async_trait]
impl ToolCatalog for StubCatalog {
    async fn list_tools(&self, _query: &ToolQuery) -> Result<Vec<ToolDefinition>, CatalogError> {
        Ok(Vec::new())
    }

    async fn execute(
        &self,
        tool_name: &str,
        _input: Value,
        _user_id: &str,
    ) -> Result<ToolOutput, CatalogError> {
        self.executed.lock().unwrap().push(tool_name.to_string());
        Ok(ToolOutput {
            value: json!({"results": []}),
            error: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Model client replaying canned responses; fails once they run out.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    responses: Mutex<VecDeque<ChatResponse>>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl ModelClient for ScriptedModel {
    async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ApiError::Status(500, "no scripted response left".into()))
    }
}

fn response_with(message: Message) -> ChatResponse {
    ChatResponse {
        id: "resp".into(),
        choices: vec![Choice {
            index: 0,
            message,
            finish_reason: Some("stop".into()),
        }],
    }
}

/// Final assistant answer without tool calls.
pub fn assistant_text(text: &str) -> ChatResponse {
    response_with(Message::assistant(text))
}

/// Assistant turn requesting `(id, tool, arguments)` calls.
pub fn assistant_tool_calls(calls: &[(&str, &str, &str)]) -> ChatResponse {
    let mut message = Message::assistant("");
    message.content = None;
    message.tool_calls = Some(
        calls
            .iter()
            .map(|(id, name, arguments)| ToolCall {
                id: id.to_string(),
                call_type: "function".into(),
                function: FunctionCall {
                    name: name.to_string(),
                    arguments: arguments.to_string(),
                },
            })
            .collect(),
    );
    response_with(message)
}

// ---------------------------------------------------------------------------
// Executor and resolver
// ---------------------------------------------------------------------------

/// Executor replaying one event list per cycle and recording each input.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    cycles: Mutex<VecDeque<Vec<Result<StreamEvent, ExecutionError>>>>,
    inputs: Mutex<Vec<AgentInput>>,
}

impl ScriptedExecutor {
    pub fn new(cycles: Vec<Vec<Result<StreamEvent, ExecutionError>>>) -> Self {
        Self {
            cycles: Mutex::new(cycles.into()),
            inputs: Mutex::new(Vec::new()),
        }
    }

    /// Inputs received, one per cycle.
    pub fn inputs(&self) -> Vec<AgentInput> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentExecutor for ScriptedExecutor {
    async fn stream(
        &self,
        input: AgentInput,
        _config: &RunConfig,
    ) -> Result<ExecutionStream, ExecutionError> {
        self.inputs.lock().unwrap().push(input);
        let events = self.cycles.lock().unwrap().pop_front().unwrap_or_default();
        Ok(ExecutionStream::from_events(events))
    }
}

/// Resolver answering from a queue of decisions; denies once it runs dry.
#[derive(Debug, Default)]
pub struct RecordingResolver {
    decisions: Mutex<VecDeque<Decision>>,
    seen: Mutex<Vec<SuspensionKind>>,
    fail: bool,
}

impl RecordingResolver {
    pub fn new(decisions: Vec<Decision>) -> Self {
        Self {
            decisions: Mutex::new(decisions.into()),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Suspensions resolved so far, in order.
    pub fn seen(&self) -> Vec<SuspensionKind> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl SuspensionResolver for RecordingResolver {
    async fn resolve(&self, kind: &SuspensionKind) -> Result<Decision, FrontendError> {
        self.seen.lock().unwrap().push(kind.clone());
        if self.fail {
            return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "terminal gone").into());
        }
        Ok(self
            .decisions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Decision::DENIED))
    }
}
