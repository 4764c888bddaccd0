//! Dialogue states of the RCIP protocol.
//!
//! Unlike a lifecycle status, an RCIP state has no terminal value: any state
//! may follow any other, and completion is a derived property of the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four RCIP dialogue phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RcipState {
    /// Opening up the space: goals, constraints, where to start.
    #[default]
    Prompting,
    /// Mirroring patterns and naming tensions back to the user.
    Reflection,
    /// Narrowing ambiguity one question at a time.
    Clarification,
    /// Pulling threads together into a throughline and next step.
    Synthesis,
}

impl RcipState {
    /// All states in declaration order.
    pub const ALL: [RcipState; 4] = [
        RcipState::Prompting,
        RcipState::Reflection,
        RcipState::Clarification,
        RcipState::Synthesis,
    ];

    /// States ordered by tie-break priority, strongest first.
    pub const PRIORITY: [RcipState; 4] = [
        RcipState::Clarification,
        RcipState::Reflection,
        RcipState::Synthesis,
        RcipState::Prompting,
    ];

    /// Returns the wire name of the state (e.g. `CLARIFICATION`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prompting => "PROMPTING",
            Self::Reflection => "REFLECTION",
            Self::Clarification => "CLARIFICATION",
            Self::Synthesis => "SYNTHESIS",
        }
    }

    /// Returns a shorter label for the state, suitable for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Prompting => "Prompting",
            Self::Reflection => "Reflecting",
            Self::Clarification => "Clarifying",
            Self::Synthesis => "Synthesizing",
        }
    }

    /// Returns the tie-break rank; lower wins.
    pub fn priority_rank(&self) -> usize {
        Self::PRIORITY
            .iter()
            .position(|s| s == self)
            .unwrap_or(Self::PRIORITY.len())
    }
}

impl fmt::Display for RcipState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown state or move name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseRcipError {
    #[error("Unknown RCIP state: {0}")]
    UnknownState(String),

    #[error("Unknown move '{name}' for state {state}")]
    UnknownMove { state: RcipState, name: String },

    #[error("Malformed move key: {0}")]
    MalformedKey(String),
}

impl FromStr for RcipState {
    type Err = ParseRcipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseRcipError::UnknownState(s.to_string()))
    }
}
