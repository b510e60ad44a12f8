//! Tool-calling chat agent backed by an OpenAI-compatible model.
//!
//! Each cycle loads the thread checkpoint, applies the input (a new user
//! message or resume decisions), then alternates model calls and tool calls
//! until the model answers without requesting tools. A tool call that is not
//! yet authorized, or that needs operator approval, is parked in the
//! checkpoint and reported as a suspension; the cycle ends there.

use super::checkpoint::{Checkpoint, Checkpointer, PendingCall, ToolGate};
use super::{
    AgentExecutor, AgentInput, AgentMessage, ExecutionStream, RunConfig, StreamEvent,
    StreamSender,
};
use crate::api::ModelClient;
use crate::catalog::ToolCatalog;
use crate::decision::ResumeCommand;
use crate::error::ExecutionError;
use crate::suspension::Suspension;
use crate::types::{ChatRequest, Message, ToolCall, ToolDefinition};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

const ASSISTANT_AUTHOR: &str = "assistant";
/// Longest tool output echoed to the operator; the model always gets it all.
const TOOL_PREVIEW_CHARS: usize = 400;
const CANCELLED_TOOL_RESULT: &str =
    "cancelled: the user sent a new message before this call was resolved";

/// Construction-time settings for [`ChatAgent`].
#[derive(Debug, Clone, Default)]
pub struct ChatAgentOptions {
    pub model: String,
    pub system_prompt: String,
    pub tools: Vec<ToolDefinition>,
    /// Tool names that always need operator approval.
    pub require_approval: Vec<String>,
    /// Identity tools are authorized and executed for.
    pub user_id: String,
}

/// Streaming agent executor; cheap to clone across cycles.
#[derive(Clone)]
pub struct ChatAgent {
    inner: Arc<ChatAgentInner>,
}

struct ChatAgentInner {
    client: Box<dyn ModelClient>,
    catalog: Arc<dyn ToolCatalog>,
    checkpointer: Arc<dyn Checkpointer>,
    model: String,
    system_prompt: String,
    tools: Vec<ToolDefinition>,
    require_approval: HashSet<String>,
    user_id: String,
}

impl ChatAgent {
    pub fn new(
        options: ChatAgentOptions,
        client: Box<dyn ModelClient>,
        catalog: Arc<dyn ToolCatalog>,
        checkpointer: Arc<dyn Checkpointer>,
    ) -> Self {
        Self {
            inner: Arc::new(ChatAgentInner {
                client,
                catalog,
                checkpointer,
                model: options.model,
                system_prompt: options.system_prompt,
                tools: options.tools,
                require_approval: options.require_approval.into_iter().collect(),
                user_id: options.user_id,
            }),
        }
    }
}

#[async_trait]
impl AgentExecutor for ChatAgent {
    async fn stream(
        &self,
        input: AgentInput,
        config: &RunConfig,
    ) -> Result<ExecutionStream, ExecutionError> {
        let (tx, stream) = ExecutionStream::channel();
        let inner = Arc::clone(&self.inner);
        let thread_id = config.thread_id.clone();
        let producer = tokio::spawn(async move {
            if let Err(err) = inner.run_cycle(input, &thread_id, &tx).await {
                let _ = tx.send(Err(err)).await;
            }
        });
        Ok(stream.with_producer(producer))
    }
}

/// Send one event; a closed receiver means the driver stopped listening.
async fn emit(tx: &StreamSender, event: StreamEvent) {
    let _ = tx.send(Ok(event)).await;
}

async fn emit_message(tx: &StreamSender, author: &str, content: &str) {
    emit(tx, StreamEvent::Message(AgentMessage::new(author, content))).await;
}

impl ChatAgentInner {
    async fn run_cycle(
        &self,
        input: AgentInput,
        thread_id: &str,
        tx: &StreamSender,
    ) -> Result<(), ExecutionError> {
        let mut checkpoint = match self.checkpointer.load(thread_id).await {
            Some(checkpoint) => checkpoint,
            None => Checkpoint::new(&self.system_prompt),
        };

        match input {
            AgentInput::Message(text) => {
                if checkpoint.has_pending() {
                    cancel_pending(&mut checkpoint);
                }
                checkpoint.messages.push(Message::user(text));
            }
            AgentInput::Resume(command) => {
                let suspensions = self.apply_resume(&mut checkpoint, command, tx).await?;
                if !suspensions.is_empty() {
                    self.checkpointer.save(thread_id, checkpoint).await;
                    emit(tx, StreamEvent::Suspended(suspensions)).await;
                    return Ok(());
                }
                // Persist tool results before the next model call.
                self.checkpointer.save(thread_id, checkpoint.clone()).await;
            }
        }

        loop {
            let request = ChatRequest {
                model: self.model.clone(),
                messages: checkpoint.messages.clone(),
                tools: (!self.tools.is_empty()).then(|| self.tools.clone()),
            };
            let response = self.client.chat(&request).await?;
            let message = response
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message)
                .ok_or(ExecutionError::EmptyResponse)?;
            let calls = message.requested_tool_calls().to_vec();
            let text = message.content.clone().unwrap_or_default();
            checkpoint.messages.push(message);

            if !text.trim().is_empty() {
                emit_message(tx, ASSISTANT_AUTHOR, text.trim()).await;
            }
            if calls.is_empty() {
                self.checkpointer.save(thread_id, checkpoint).await;
                return Ok(());
            }

            let mut suspensions = Vec::new();
            for call in calls {
                emit_message(
                    tx,
                    ASSISTANT_AUTHOR,
                    &format!(
                        "calling `{}` with {}",
                        call.function.name, call.function.arguments
                    ),
                )
                .await;
                match self.gate_for(&call).await? {
                    Some((gate, suspension)) => {
                        debug!(tool = %call.function.name, ?gate, "tool call suspended");
                        checkpoint.pending.push(PendingCall { call, gate });
                        suspensions.push(suspension);
                    }
                    None => self.run_tool(&mut checkpoint, &call, tx).await,
                }
            }

            if !suspensions.is_empty() {
                self.checkpointer.save(thread_id, checkpoint).await;
                emit(tx, StreamEvent::Suspended(suspensions)).await;
                return Ok(());
            }
        }
    }

    /// Apply decisions to parked calls. Returns suspensions raised anew.
    async fn apply_resume(
        &self,
        checkpoint: &mut Checkpoint,
        command: ResumeCommand,
        tx: &StreamSender,
    ) -> Result<Vec<Suspension>, ExecutionError> {
        if !checkpoint.has_pending() {
            return Err(ExecutionError::NothingToResume);
        }
        let decisions = command.decisions();
        if decisions.len() != checkpoint.pending.len() {
            return Err(ExecutionError::ResumeMismatch {
                expected: checkpoint.pending.len(),
                received: decisions.len(),
            });
        }

        let pending = std::mem::take(&mut checkpoint.pending);
        let mut suspensions = Vec::new();
        for (PendingCall { call, gate }, decision) in pending.into_iter().zip(decisions) {
            let name = call.function.name.clone();
            if !decision.authorized {
                let text = denial_text(gate, &name);
                checkpoint
                    .messages
                    .push(Message::tool_result(&call.id, &name, &text));
                emit_message(tx, &name, &text).await;
                continue;
            }
            // An authorized tool may still need the operator's sign-off.
            if gate == ToolGate::Authorization {
                if let Some((gate, suspension)) = self.approval_gate(&call) {
                    checkpoint.pending.push(PendingCall { call, gate });
                    suspensions.push(suspension);
                    continue;
                }
            }
            self.run_tool(checkpoint, &call, tx).await;
        }
        Ok(suspensions)
    }

    async fn gate_for(
        &self,
        call: &ToolCall,
    ) -> Result<Option<(ToolGate, Suspension)>, ExecutionError> {
        let name = &call.function.name;
        let auth = self.catalog.authorize(name, &self.user_id).await?;
        if !auth.is_completed() {
            let id = auth.id.unwrap_or_default();
            let url = auth.url.unwrap_or_default();
            return Ok(Some((
                ToolGate::Authorization,
                Suspension::authorization(name, &id, &url),
            )));
        }
        Ok(self.approval_gate(call))
    }

    fn approval_gate(&self, call: &ToolCall) -> Option<(ToolGate, Suspension)> {
        let name = &call.function.name;
        self.require_approval.contains(name).then(|| {
            (
                ToolGate::Approval,
                Suspension::approval(name, call.function.arguments_value()),
            )
        })
    }

    /// Execute one call and record its result. Tool failures go to the model.
    async fn run_tool(&self, checkpoint: &mut Checkpoint, call: &ToolCall, tx: &StreamSender) {
        let name = &call.function.name;
        let text = match self
            .catalog
            .execute(name, call.function.arguments_value(), &self.user_id)
            .await
        {
            Ok(output) => output.to_model_text(),
            Err(err) => {
                warn!(tool = %name, error = %err, "tool execution failed");
                format!("tool error: {err}")
            }
        };
        emit_message(tx, name, &preview(&text)).await;
        checkpoint
            .messages
            .push(Message::tool_result(&call.id, name, text));
    }
}

/// Answer every parked call so the history stays well-formed.
fn cancel_pending(checkpoint: &mut Checkpoint) {
    for PendingCall { call, .. } in std::mem::take(&mut checkpoint.pending) {
        checkpoint.messages.push(Message::tool_result(
            &call.id,
            &call.function.name,
            CANCELLED_TOOL_RESULT,
        ));
    }
}

fn denial_text(gate: ToolGate, tool_name: &str) -> String {
    match gate {
        ToolGate::Authorization => {
            format!("denied: the user did not authorize `{tool_name}`")
        }
        ToolGate::Approval => format!("denied: the user rejected this call to `{tool_name}`"),
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= TOOL_PREVIEW_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(TOOL_PREVIEW_CHARS).collect();
    format!("{cut}...")
}
