//! Agent execution collaborator.
//!
//! An [`AgentExecutor`] runs one execution cycle for a session and reports
//! what happened through an [`ExecutionStream`]: zero or more messages in the
//! order they were produced, optionally followed by the batch of suspensions
//! that stopped the cycle. The turn driver drains one stream completely before
//! it starts the next cycle.

use crate::decision::ResumeCommand;
use crate::error::ExecutionError;
use crate::suspension::Suspension;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

mod chat;
mod checkpoint;

pub use chat::{ChatAgent, ChatAgentOptions};
pub use checkpoint::{Checkpoint, Checkpointer, MemorySaver, PendingCall, ToolGate};

/// Buffered events between a producing cycle and the driver.
const STREAM_BUFFER: usize = 32;

/// What the next execution cycle should act on.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentInput {
    /// A fresh user utterance starting a turn.
    Message(String),
    /// Decisions answering the previous cycle's suspensions.
    Resume(ResumeCommand),
}

/// Per-session settings passed with every cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Thread id keying the executor's checkpoint.
    pub thread_id: String,
}

/// One message surfaced while a cycle runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentMessage {
    /// Who produced it: `assistant` or the tool name.
    pub author: String,
    pub content: String,
}

impl AgentMessage {
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
        }
    }
}

/// Items yielded by an [`ExecutionStream`].
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Message(AgentMessage),
    /// Suspensions raised by the cycle, in the order they were raised.
    Suspended(Vec<Suspension>),
}

/// Sending half handed to a cycle producer.
pub type StreamSender = mpsc::Sender<Result<StreamEvent, ExecutionError>>;

/// Ordered, single-pass sequence of cycle events.
///
/// Dropping the stream aborts the producing task, if one is attached.
pub struct ExecutionStream {
    rx: mpsc::Receiver<Result<StreamEvent, ExecutionError>>,
    producer: Option<JoinHandle<()>>,
}

impl ExecutionStream {
    /// Create a connected sender/stream pair.
    pub fn channel() -> (StreamSender, Self) {
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        (tx, Self { rx, producer: None })
    }

    /// Stream that replays a fixed list of events.
    pub fn from_events(events: Vec<Result<StreamEvent, ExecutionError>>) -> Self {
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            // Capacity covers every event, so this never fails.
            let _ = tx.try_send(event);
        }
        Self { rx, producer: None }
    }

    /// Tie the lifetime of the producing task to this stream.
    pub fn with_producer(mut self, producer: JoinHandle<()>) -> Self {
        self.producer = Some(producer);
        self
    }

    /// Next event, or `None` once the producer is finished.
    ///
    /// A producer that panicked or was cancelled before finishing yields
    /// [`ExecutionError::StreamClosed`] instead of a clean end.
    pub async fn next(&mut self) -> Option<Result<StreamEvent, ExecutionError>> {
        if let Some(event) = self.rx.recv().await {
            return Some(event);
        }
        let producer = self.producer.take()?;
        match producer.await {
            Ok(()) => None,
            Err(err) => {
                warn!(error = %err, "execution producer ended abnormally");
                Some(Err(ExecutionError::StreamClosed))
            }
        }
    }
}

impl Drop for ExecutionStream {
    fn drop(&mut self) {
        if let Some(producer) = self.producer.take() {
            producer.abort();
        }
    }
}

/// Streaming execution interface the turn driver runs cycles against.
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    /// Start one cycle for `input` within the session named by `config`.
    async fn stream(
        &self,
        input: AgentInput,
        config: &RunConfig,
    ) -> Result<ExecutionStream, ExecutionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replayed_stream_yields_events_in_order_then_ends() {
        let mut stream = ExecutionStream::from_events(vec![
            Ok(StreamEvent::Message(AgentMessage::new("assistant", "one"))),
            Ok(StreamEvent::Message(AgentMessage::new("assistant", "two"))),
        ]);
        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(
            first,
            StreamEvent::Message(AgentMessage::new("assistant", "one"))
        );
        assert!(stream.next().await.unwrap().is_ok());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn empty_replay_ends_immediately() {
        let mut stream = ExecutionStream::from_events(Vec::new());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn finished_producer_ends_the_stream_cleanly() {
        let (tx, stream) = ExecutionStream::channel();
        let producer = tokio::spawn(async move {
            let _ = tx
                .send(Ok(StreamEvent::Message(AgentMessage::new("assistant", "hi"))))
                .await;
        });
        let mut stream = stream.with_producer(producer);
        assert!(stream.next().await.unwrap().is_ok());
        assert!(stream.next().await.is_none());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn panicking_producer_surfaces_stream_closed() {
        let (tx, stream) = ExecutionStream::channel();
        let producer = tokio::spawn(async move {
            let _ = tx
                .send(Ok(StreamEvent::Message(AgentMessage::new("assistant", "partial"))))
                .await;
            drop(tx);
            panic!("cycle producer crashed");
        });
        let mut stream = stream.with_producer(producer);
        assert!(stream.next().await.unwrap().is_ok());
        assert!(matches!(
            stream.next().await,
            Some(Err(ExecutionError::StreamClosed))
        ));
        assert!(stream.next().await.is_none());
    }

    struct DropSignal(Option<tokio::sync::oneshot::Sender<()>>);

    impl Drop for DropSignal {
        fn drop(&mut self) {
            if let Some(tx) = self.0.take() {
                let _ = tx.send(());
            }
        }
    }

    #[tokio::test]
    async fn dropping_stream_aborts_producer() {
        let (_tx, stream) = ExecutionStream::channel();
        let (dropped_tx, dropped_rx) = tokio::sync::oneshot::channel();
        let producer = tokio::spawn(async move {
            let _signal = DropSignal(Some(dropped_tx));
            std::future::pending::<()>().await;
        });
        drop(stream.with_producer(producer));
        tokio::time::timeout(std::time::Duration::from_secs(5), dropped_rx)
            .await
            .expect("producer should be aborted")
            .expect("drop signal should fire");
    }
}
