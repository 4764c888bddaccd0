//! Per-state move enumerations.
//!
//! Each state owns a closed set of moves. `Move` wraps the four per-state
//! enums so a move can never be paired with a state it does not belong to.
//! Moves serialize as `STATE.MOVE` keys (e.g. `SYNTHESIS.COLD_CORE`), the
//! same keys the template library and hint table are indexed by.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::state::{ParseRcipError, RcipState};

/// Generates a move enum with its name table and default variant.
macro_rules! move_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident, {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// All moves of this state in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Returns the wire name of the move.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $wire ),+
                }
            }

            fn parse(name: &str) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|m| m.as_str().eq_ignore_ascii_case(name))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }
    };
}

move_enum! {
    /// Moves available while prompting.
    PromptingMove, default = OpenDoor, {
        /// Wide-open invitation to say what is on the user's mind.
        OpenDoor => "OPEN_DOOR",
        /// Asks what outcome the user is reaching for.
        GoalProbe => "GOAL_PROBE",
        /// Surfaces hard limits and obligations.
        ConstraintProbe => "CONSTRAINT_PROBE",
        /// Looks at the situation through a specific role.
        RoleLens => "ROLE_LENS",
        /// Locates exactly where the user is blocked.
        StuckPoint => "STUCK_POINT",
    }
}

move_enum! {
    /// Moves available while reflecting.
    ReflectionMove, default = ThreadWeave, {
        /// Names a recurring behavior back to the user.
        MirrorPattern => "MIRROR_PATTERN",
        /// Names two truths pulling against each other.
        TensionName => "TENSION_NAME",
        /// Makes an unstated assumption explicit.
        AssumptionSurface => "ASSUMPTION_SURFACE",
        /// Connects two threads the user has raised separately.
        ThreadWeave => "THREAD_WEAVE",
    }
}

move_enum! {
    /// Moves available while clarifying.
    ClarificationMove, default = SingleNeedle, {
        /// One precise question aimed at the vaguest point.
        SingleNeedle => "SINGLE_NEEDLE",
        /// Forces a choice between two named options.
        BinaryFork => "BINARY_FORK",
        /// Checks whether the conversation is heading where the user wants.
        TrackCheck => "TRACK_CHECK",
        /// Asks how the user will judge a good outcome.
        CriteriaCheck => "CRITERIA_CHECK",
        /// Picks one thread out of a scattered set.
        ThreadPick => "THREAD_PICK",
    }
}

move_enum! {
    /// Moves available while synthesizing.
    SynthesisMove, default = ColdCore, {
        /// States the hard center of the matter without softening.
        ColdCore => "COLD_CORE",
        /// Offers a first draft of the throughline.
        ThroughlineDraft => "THROUGHLINE_DRAFT",
        /// Commits to one concrete next step.
        NextStep => "NEXT_STEP",
        /// Defines what done looks like.
        AcceptanceTest => "ACCEPTANCE_TEST",
        /// Resolves or reframes a named tension.
        TensionResolve => "TENSION_RESOLVE",
        /// Frames the moment something clicked.
        BreakthroughFrame => "BREAKTHROUGH_FRAME",
    }
}

/// A move paired with the state that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Move {
    Prompting(PromptingMove),
    Reflection(ReflectionMove),
    Clarification(ClarificationMove),
    Synthesis(SynthesisMove),
}

impl Move {
    /// Returns the state this move belongs to.
    pub fn state(&self) -> RcipState {
        match self {
            Self::Prompting(_) => RcipState::Prompting,
            Self::Reflection(_) => RcipState::Reflection,
            Self::Clarification(_) => RcipState::Clarification,
            Self::Synthesis(_) => RcipState::Synthesis,
        }
    }

    /// Returns the bare move name (e.g. `COLD_CORE`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Prompting(m) => m.as_str(),
            Self::Reflection(m) => m.as_str(),
            Self::Clarification(m) => m.as_str(),
            Self::Synthesis(m) => m.as_str(),
        }
    }

    /// Returns the `STATE.MOVE` key.
    pub fn key(&self) -> String {
        format!("{}.{}", self.state().as_str(), self.name())
    }

    /// Returns the fixed fallback move for a state.
    pub fn default_for(state: RcipState) -> Self {
        match state {
            RcipState::Prompting => Self::Prompting(PromptingMove::default()),
            RcipState::Reflection => Self::Reflection(ReflectionMove::default()),
            RcipState::Clarification => Self::Clarification(ClarificationMove::default()),
            RcipState::Synthesis => Self::Synthesis(SynthesisMove::default()),
        }
    }

    /// Returns every move owned by a state.
    pub fn all_for(state: RcipState) -> Vec<Self> {
        match state {
            RcipState::Prompting => PromptingMove::ALL.iter().map(|m| Self::Prompting(*m)).collect(),
            RcipState::Reflection => ReflectionMove::ALL.iter().map(|m| Self::Reflection(*m)).collect(),
            RcipState::Clarification => ClarificationMove::ALL
                .iter()
                .map(|m| Self::Clarification(*m))
                .collect(),
            RcipState::Synthesis => SynthesisMove::ALL.iter().map(|m| Self::Synthesis(*m)).collect(),
        }
    }

    /// Parses a bare move name within the given state.
    pub fn parse_in(state: RcipState, name: &str) -> Result<Self, ParseRcipError> {
        let name = name.trim();
        let parsed = match state {
            RcipState::Prompting => PromptingMove::parse(name).map(Self::Prompting),
            RcipState::Reflection => ReflectionMove::parse(name).map(Self::Reflection),
            RcipState::Clarification => ClarificationMove::parse(name).map(Self::Clarification),
            RcipState::Synthesis => SynthesisMove::parse(name).map(Self::Synthesis),
        };
        parsed.ok_or_else(|| ParseRcipError::UnknownMove {
            state,
            name: name.to_string(),
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.state().as_str(), self.name())
    }
}

impl FromStr for Move {
    type Err = ParseRcipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (state, name) = s
            .split_once('.')
            .ok_or_else(|| ParseRcipError::MalformedKey(s.to_string()))?;
        Self::parse_in(state.parse()?, name)
    }
}

impl From<Move> for String {
    fn from(mv: Move) -> Self {
        mv.key()
    }
}

impl TryFrom<String> for Move {
    type Error = ParseRcipError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
