//! Per-session RCIP orchestrator.
//!
//! Drives intent classification, move selection and scratchpad maintenance
//! for one conversation. An `Engine` is owned by exactly one session.
//!
//! # Invariants
//!
//! - `turn_count` grows by exactly one per `process_user_input`
//! - `move_history().len() == turn_count()` at all times
//! - `is_done()` holds once `turn_count >= max_turns`

use serde::{Deserialize, Serialize};

use crate::domain::conversation::ConversationHistory;

use super::classifier::IntentClassifier;
use super::move_selector::MoveSelector;
use super::moves::{
    ClarificationMove, Move, PromptingMove, ReflectionMove, SynthesisMove,
};
use super::scratchpad::{MoveRecord, Scratchpad, ScratchpadUpdate};
use super::state::RcipState;

/// Turn ceiling after which a session is considered done.
pub const DEFAULT_MAX_TURNS: u32 = 20;

/// Outcome of one processed user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RcipResult {
    pub state: RcipState,
    #[serde(rename = "move")]
    pub mv: Move,
    pub turn_count: u32,
    pub is_done: bool,
    /// Snapshot copy taken after this turn's updates.
    pub scratchpad: Scratchpad,
    pub next_state_hint: String,
}

/// Conversational state machine for one session.
#[derive(Debug, Clone)]
pub struct Engine {
    classifier: IntentClassifier,
    selector: MoveSelector,
    state: RcipState,
    turn_count: u32,
    max_turns: u32,
    scratchpad: Scratchpad,
    completed: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(IntentClassifier::default(), MoveSelector::default())
    }
}

impl Engine {
    pub fn new(classifier: IntentClassifier, selector: MoveSelector) -> Self {
        Self {
            classifier,
            selector,
            state: RcipState::default(),
            turn_count: 0,
            max_turns: DEFAULT_MAX_TURNS,
            scratchpad: Scratchpad::new(),
            completed: false,
        }
    }

    /// Overrides the turn ceiling. Zero is clamped to one.
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> RcipState {
        self.state
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    pub fn scratchpad(&self) -> &Scratchpad {
        &self.scratchpad
    }

    pub fn move_history(&self) -> &[MoveRecord] {
        self.scratchpad.move_history()
    }

    /// True when the conversation has produced its outcome or run out of turns.
    pub fn is_done(&self) -> bool {
        let synthesized = self.scratchpad.has_throughline()
            && !self.scratchpad.acceptance_criteria().is_empty();
        synthesized || self.turn_count >= self.max_turns || self.completed
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Classifies one user turn and folds it into session state.
    pub fn process_user_input(
        &mut self,
        user_input: &str,
        history: &ConversationHistory,
    ) -> RcipResult {
        let state = self
            .classifier
            .detect_intent(user_input, self.scratchpad.move_history());
        let mv = self.selector.detect_move(state, user_input);

        self.turn_count += 1;
        self.state = state;
        self.scratchpad
            .record_move(MoveRecord::new(self.turn_count, mv, user_input));
        self.scratchpad.update_entities(user_input);

        tracing::debug!(
            turn = self.turn_count,
            move_key = %mv,
            history_len = history.len(),
            "Processed user turn"
        );

        RcipResult {
            state,
            mv,
            turn_count: self.turn_count,
            is_done: self.is_done(),
            scratchpad: self.scratchpad.clone(),
            next_state_hint: next_state_hint(mv).to_string(),
        }
    }

    /// Merges caller-supplied findings into the scratchpad.
    pub fn update_scratchpad(&mut self, update: ScratchpadUpdate) {
        self.scratchpad.apply(update);
    }

    /// Sets the explicit completion flag.
    pub fn mark_complete(&mut self) {
        self.completed = true;
    }

    /// Reinitializes every field except the configured turn ceiling.
    pub fn reset(&mut self) {
        self.state = RcipState::default();
        self.turn_count = 0;
        self.scratchpad = Scratchpad::new();
        self.completed = false;
    }
}

/// Advisory description of where the conversation is likely headed next.
///
/// Informational only; transitions are never validated against it.
pub fn next_state_hint(mv: Move) -> &'static str {
    match mv {
        Move::Prompting(m) => match m {
            PromptingMove::OpenDoor => "Listen for a goal or a sticking point, then probe it",
            PromptingMove::GoalProbe => "Once the goal is named, reflect on what stands in its way",
            PromptingMove::ConstraintProbe => "Test which constraints are real before reflecting",
            PromptingMove::RoleLens => "Reflect on how the role shapes the options",
            PromptingMove::StuckPoint => "Clarify the exact point of friction",
        },
        Move::Reflection(m) => match m {
            ReflectionMove::MirrorPattern => "If the pattern lands, name the tension behind it",
            ReflectionMove::TensionName => "Clarify which side carries more weight",
            ReflectionMove::AssumptionSurface => "Clarify whether the assumption holds",
            ReflectionMove::ThreadWeave => "Move toward synthesis if the threads connect",
        },
        Move::Clarification(m) => match m {
            ClarificationMove::SingleNeedle => "Reflect on the answer or move toward synthesis",
            ClarificationMove::BinaryFork => "Synthesize around the chosen side",
            ClarificationMove::TrackCheck => "Return to prompting if the track changed",
            ClarificationMove::CriteriaCheck => "Draft acceptance criteria during synthesis",
            ClarificationMove::ThreadPick => "Reflect on the chosen thread",
        },
        Move::Synthesis(m) => match m {
            SynthesisMove::ColdCore => "Draft the throughline from the core truth",
            SynthesisMove::ThroughlineDraft => "Confirm the throughline, then define done",
            SynthesisMove::NextStep => "Close the session once the step is committed",
            SynthesisMove::AcceptanceTest => "Close the session once done is defined",
            SynthesisMove::TensionResolve => "Draft the throughline around the resolution",
            SynthesisMove::BreakthroughFrame => "Capture the breakthrough and pick a next step",
        },
    }
}
