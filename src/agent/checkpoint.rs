//! Per-session conversation checkpoints.

use crate::types::{Message, ToolCall};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Why a tool call is waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolGate {
    /// The user has not authorized the tool yet.
    Authorization,
    /// The operator must approve this specific call.
    Approval,
}

/// A tool call held back until its suspension is answered.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCall {
    pub call: ToolCall,
    pub gate: ToolGate,
}

/// Everything the agent remembers about one thread.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Checkpoint {
    pub messages: Vec<Message>,
    /// Gated calls in the order their suspensions were raised.
    pub pending: Vec<PendingCall>,
}

impl Checkpoint {
    /// Fresh thread seeded with the system prompt.
    pub fn new(system_prompt: &str) -> Self {
        let mut messages = Vec::new();
        if !system_prompt.trim().is_empty() {
            messages.push(Message::system(system_prompt));
        }
        Self {
            messages,
            pending: Vec::new(),
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Persistence strategy for checkpoints keyed by thread id.
#[async_trait]
pub trait Checkpointer: Send + Sync {
    async fn load(&self, thread_id: &str) -> Option<Checkpoint>;
    async fn save(&self, thread_id: &str, checkpoint: Checkpoint);
}

/// In-memory checkpointer; state lives as long as the process.
#[derive(Debug, Default)]
pub struct MemorySaver {
    threads: Mutex<HashMap<String, Checkpoint>>,
}

impl MemorySaver {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Checkpointer for MemorySaver {
    async fn load(&self, thread_id: &str) -> Option<Checkpoint> {
        self.threads.lock().await.get(thread_id).cloned()
    }

    async fn save(&self, thread_id: &str, checkpoint: Checkpoint) {
        self.threads
            .lock()
            .await
            .insert(thread_id.to_string(), checkpoint);
    }
}
