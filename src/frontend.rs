//! Line-oriented interactive front end.
//!
//! The session loop and the approval prompt share one [`Frontend`]; reads are
//! serialized so a prompt issued mid-turn never races the next user turn.

use crate::error::FrontendError;
use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Source of operator input lines.
#[async_trait]
pub trait Frontend: Send + Sync {
    /// Show `prompt` and wait for one line. `Ok(None)` means end of input.
    async fn read_line(&self, prompt: &str) -> Result<Option<String>, FrontendError>;
}

/// Parsed answer to a yes/no approval question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalAnswer {
    Approve,
    Deny,
}

/// Parse `y/n` approval input. Empty input counts as a denial.
pub fn parse_approval_answer(input: &str) -> Option<ApprovalAnswer> {
    let normalized = input.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "y" | "yes" => Some(ApprovalAnswer::Approve),
        "" | "n" | "no" => Some(ApprovalAnswer::Deny),
        _ => None,
    }
}

/// Ask until the operator gives a recognizable yes/no.
///
/// End of input is treated as "no" so a closed terminal never approves.
pub async fn confirm(frontend: &dyn Frontend, prompt: &str) -> Result<bool, FrontendError> {
    loop {
        let Some(line) = frontend.read_line(prompt).await? else {
            return Ok(false);
        };
        match parse_approval_answer(&line) {
            Some(answer) => return Ok(answer == ApprovalAnswer::Approve),
            None => continue,
        }
    }
}

/// True when the line, minus its terminator, is `exit` in any case.
///
/// Surrounding spaces are kept, so `"  exit "` is an ordinary message.
pub fn is_exit_command(input: &str) -> bool {
    input
        .trim_end_matches(['\r', '\n'])
        .eq_ignore_ascii_case("exit")
}

/// Stdin-backed front end writing prompts to stderr.
pub struct TerminalFrontend {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl TerminalFrontend {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for TerminalFrontend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Frontend for TerminalFrontend {
    async fn read_line(&self, prompt: &str) -> Result<Option<String>, FrontendError> {
        let mut lines = self.lines.lock().await;
        let mut stderr = std::io::stderr();
        stderr.write_all(prompt.as_bytes())?;
        stderr.flush()?;
        Ok(lines.next_line().await?)
    }
}
