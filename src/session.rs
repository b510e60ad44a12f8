//! Interactive session: one thread id, many sequential turns.

use crate::agent::RunConfig;
use crate::driver::TurnDriver;
use crate::error::{FrontendError, TurnError};
use crate::frontend::{is_exit_command, Frontend};
use crate::ui::render::RenderSink;
use crate::ui::settings;
use std::sync::Arc;
use tracing::{debug, warn};

pub const WELCOME_TEXT: &str = "Welcome to the chatbot! Type 'exit' to quit.";
pub const FAREWELL_TEXT: &str = "👋 Bye...";

/// Conversation handle shared by every turn of one process run.
///
/// Owned by the session loop and lent `&mut` to the driver, so only one turn
/// touches it at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    run_config: RunConfig,
    turns: u64,
}

impl Session {
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            run_config: RunConfig {
                thread_id: thread_id.into(),
            },
            turns: 0,
        }
    }

    pub fn thread_id(&self) -> &str {
        &self.run_config.thread_id
    }

    pub fn run_config(&self) -> &RunConfig {
        &self.run_config
    }

    /// Turns started in this session.
    pub fn turns(&self) -> u64 {
        self.turns
    }

    pub(crate) fn begin_turn(&mut self) {
        self.turns += 1;
    }
}

/// Read-evaluate loop feeding user lines to the turn driver.
pub struct SessionLoop {
    driver: TurnDriver,
    frontend: Arc<dyn Frontend>,
    renderer: Arc<dyn RenderSink>,
}

impl SessionLoop {
    pub fn new(
        driver: TurnDriver,
        frontend: Arc<dyn Frontend>,
        renderer: Arc<dyn RenderSink>,
    ) -> Self {
        Self {
            driver,
            frontend,
            renderer,
        }
    }

    /// Run until `exit` or end of input.
    ///
    /// Turn failures are reported and the loop goes on; only front-end
    /// failures end it with an error.
    pub async fn run(&self, session: &mut Session) -> Result<(), FrontendError> {
        self.renderer.welcome(WELCOME_TEXT);
        loop {
            let Some(line) = self.frontend.read_line(settings::PROMPT_PRIMARY).await? else {
                debug!("end of input");
                break;
            };
            if is_exit_command(&line) {
                break;
            }

            match self.driver.run_turn(session, &line).await {
                Ok(report) => debug!(
                    cycles = report.cycles,
                    rounds = report.rounds(),
                    "turn report"
                ),
                Err(TurnError::Frontend(err)) => return Err(err),
                Err(err) => {
                    warn!(error = %err, "turn failed");
                    self.renderer.error(&err.to_string());
                }
            }
        }
        self.renderer.farewell(FAREWELL_TEXT);
        Ok(())
    }
}
