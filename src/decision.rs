//! Decisions and the resume command built from them.

use serde::{Deserialize, Serialize};

/// Resolution of one suspension: granted/approved or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub authorized: bool,
}

impl Decision {
    pub const GRANTED: Decision = Decision { authorized: true };
    pub const DENIED: Decision = Decision { authorized: false };

    pub fn from_bool(authorized: bool) -> Self {
        Self { authorized }
    }
}

/// Value fed back into the next execution cycle.
///
/// Serializes untagged: a bare decision object for one suspension, a JSON array
/// for a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResumeCommand {
    Single(Decision),
    Batch(Vec<Decision>),
}

impl ResumeCommand {
    /// Build the command for a batch of decisions in raised order.
    ///
    /// Returns `None` for an empty batch: nothing was suspended, so there is
    /// nothing to resume.
    pub fn from_decisions(mut decisions: Vec<Decision>) -> Option<Self> {
        match decisions.len() {
            0 => None,
            1 => decisions.pop().map(Self::Single),
            _ => Some(Self::Batch(decisions)),
        }
    }

    /// Number of suspensions this command answers.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(decisions) => decisions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decisions in raised order regardless of shape.
    pub fn decisions(&self) -> Vec<Decision> {
        match self {
            Self::Single(decision) => vec![*decision],
            Self::Batch(decisions) => decisions.clone(),
        }
    }
}
