//! Turn driver: run execution cycles until no suspension is left.
//!
//! One turn moves through three states. `Executing` runs a cycle and drains
//! its stream, `AwaitingDecisions` resolves the batch that cycle raised, and
//! `Done` ends the turn. Cycles and suspension rounds alternate until a cycle
//! completes without suspending, however many rounds that takes.

use crate::agent::{AgentExecutor, AgentInput, StreamEvent};
use crate::collector::SuspensionResolver;
use crate::decision::{Decision, ResumeCommand};
use crate::error::TurnError;
use crate::session::Session;
use crate::suspension::{classify, Suspension};
use crate::ui::render::RenderSink;
use std::sync::Arc;
use tracing::{debug, info};

/// Where a turn currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnState {
    Executing(AgentInput),
    AwaitingDecisions(Vec<Suspension>),
    Done,
}

/// Summary of a finished turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnReport {
    /// Execution cycles run, including the first.
    pub cycles: u32,
    /// Every decision collected, in the order suspensions were raised.
    pub decisions: Vec<Decision>,
}

impl TurnReport {
    /// Number of suspension rounds resolved during the turn.
    pub fn rounds(&self) -> u32 {
        self.cycles.saturating_sub(1)
    }
}

pub struct TurnDriver {
    executor: Arc<dyn AgentExecutor>,
    resolver: Arc<dyn SuspensionResolver>,
    renderer: Arc<dyn RenderSink>,
    max_rounds: Option<u32>,
}

impl TurnDriver {
    pub fn new(
        executor: Arc<dyn AgentExecutor>,
        resolver: Arc<dyn SuspensionResolver>,
        renderer: Arc<dyn RenderSink>,
    ) -> Self {
        Self {
            executor,
            resolver,
            renderer,
            max_rounds: None,
        }
    }

    /// Abandon a turn once this many rounds were resolved and it suspends again.
    pub fn with_max_rounds(mut self, max_rounds: Option<u32>) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Drive one user utterance to completion.
    pub async fn run_turn(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<TurnReport, TurnError> {
        session.begin_turn();
        let mut report = TurnReport::default();
        let mut rounds = 0u32;
        let mut state = TurnState::Executing(AgentInput::Message(text.to_string()));

        loop {
            state = match state {
                TurnState::Executing(input) => {
                    report.cycles += 1;
                    let suspensions = self.execute_cycle(session, input).await?;
                    debug!(
                        cycle = report.cycles,
                        suspensions = suspensions.len(),
                        "cycle finished"
                    );
                    if suspensions.is_empty() {
                        TurnState::Done
                    } else if self.max_rounds.is_some_and(|max| rounds >= max) {
                        return Err(TurnError::RoundLimitExceeded { rounds });
                    } else {
                        TurnState::AwaitingDecisions(suspensions)
                    }
                }
                TurnState::AwaitingDecisions(batch) => {
                    rounds += 1;
                    let decisions = self.collect_decisions(&batch).await?;
                    report.decisions.extend(decisions.iter().copied());
                    match ResumeCommand::from_decisions(decisions) {
                        Some(command) => TurnState::Executing(AgentInput::Resume(command)),
                        None => TurnState::Done,
                    }
                }
                TurnState::Done => {
                    info!(
                        thread = %session.thread_id(),
                        cycles = report.cycles,
                        decisions = report.decisions.len(),
                        "turn complete"
                    );
                    return Ok(report);
                }
            };
        }
    }

    /// Run one cycle, rendering messages as they arrive.
    async fn execute_cycle(
        &self,
        session: &Session,
        input: AgentInput,
    ) -> Result<Vec<Suspension>, TurnError> {
        let mut stream = self.executor.stream(input, session.run_config()).await?;
        let mut suspensions = Vec::new();
        while let Some(event) = stream.next().await {
            match event? {
                StreamEvent::Message(message) => {
                    self.renderer.agent_message(&message.author, &message.content);
                }
                StreamEvent::Suspended(batch) => suspensions.extend(batch),
            }
        }
        Ok(suspensions)
    }

    /// Resolve each suspension in raised order, one at a time.
    async fn collect_decisions(&self, batch: &[Suspension]) -> Result<Vec<Decision>, TurnError> {
        let mut decisions = Vec::with_capacity(batch.len());
        for suspension in batch {
            let kind = classify(suspension);
            debug!(kind = kind.label(), tool = ?kind.tool_name(), "resolving suspension");
            decisions.push(self.resolver.resolve(&kind).await?);
        }
        Ok(decisions)
    }
}
