//! Structured running memory for one conversation.
//!
//! # Invariants
//!
//! - `entities.len() <= MAX_ENTITIES`, most recently seen first, no duplicates
//! - `truths_in_tension.len() <= MAX_TENSIONS` (most recent kept)
//! - `open_questions.len() <= MAX_OPEN_QUESTIONS` (most recent kept)
//! - `recent_themes.len() <= MAX_RECENT_THEMES` (most recent kept)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::moves::Move;
use super::patterns::significant_words;
use super::state::RcipState;

/// Maximum number of tracked entities.
pub const MAX_ENTITIES: usize = 20;

/// Maximum number of truths held in tension.
pub const MAX_TENSIONS: usize = 3;

/// Maximum number of open questions.
pub const MAX_OPEN_QUESTIONS: usize = 5;

/// Maximum number of recent themes.
pub const MAX_RECENT_THEMES: usize = 5;

/// Characters of user input kept on a move record.
pub const MOVE_INPUT_PREVIEW_CHARS: usize = 100;

/// One classified turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub turn: u32,
    pub state: RcipState,
    #[serde(rename = "move")]
    pub mv: Move,
    pub input: String,
}

impl MoveRecord {
    /// Creates a record, truncating the input preview.
    pub fn new(turn: u32, mv: Move, input: &str) -> Self {
        Self {
            turn,
            state: mv.state(),
            mv,
            input: input.chars().take(MOVE_INPUT_PREVIEW_CHARS).collect(),
        }
    }
}

/// Caller-supplied partial update, typically relayed from the external
/// text generator (a new tension, definition, question, goal or throughline).
///
/// Scalars overwrite, maps merge key-wise, lists append before capping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScratchpadUpdate {
    pub goal: Option<String>,
    pub assumptions: Vec<String>,
    pub truths_in_tension: Vec<String>,
    pub definitions: BTreeMap<String, String>,
    pub acceptance_criteria: BTreeMap<String, String>,
    pub throughline: Option<String>,
    pub open_questions: Vec<String>,
    pub recent_themes: Vec<String>,
}

impl ScratchpadUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = Some(goal.into());
        self
    }

    pub fn with_assumption(mut self, assumption: impl Into<String>) -> Self {
        self.assumptions.push(assumption.into());
        self
    }

    pub fn with_tension(mut self, tension: impl Into<String>) -> Self {
        self.truths_in_tension.push(tension.into());
        self
    }

    pub fn with_definition(mut self, term: impl Into<String>, definition: impl Into<String>) -> Self {
        self.definitions.insert(term.into(), definition.into());
        self
    }

    pub fn with_acceptance_criterion(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.acceptance_criteria.insert(key.into(), value.into());
        self
    }

    pub fn with_throughline(mut self, throughline: impl Into<String>) -> Self {
        self.throughline = Some(throughline.into());
        self
    }

    pub fn with_open_question(mut self, question: impl Into<String>) -> Self {
        self.open_questions.push(question.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.recent_themes.push(theme.into());
        self
    }

    /// True if applying this update would change nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Mutable structured memory for one live session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scratchpad {
    goal: Option<String>,
    assumptions: Vec<String>,
    truths_in_tension: Vec<String>,
    definitions: BTreeMap<String, String>,
    acceptance_criteria: BTreeMap<String, String>,
    throughline: Option<String>,
    open_questions: Vec<String>,
    move_history: Vec<MoveRecord>,
    entities: Vec<String>,
    recent_themes: Vec<String>,
}

impl Scratchpad {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn goal(&self) -> Option<&str> {
        self.goal.as_deref()
    }

    pub fn assumptions(&self) -> &[String] {
        &self.assumptions
    }

    pub fn truths_in_tension(&self) -> &[String] {
        &self.truths_in_tension
    }

    pub fn definitions(&self) -> &BTreeMap<String, String> {
        &self.definitions
    }

    pub fn acceptance_criteria(&self) -> &BTreeMap<String, String> {
        &self.acceptance_criteria
    }

    pub fn throughline(&self) -> Option<&str> {
        self.throughline.as_deref()
    }

    pub fn open_questions(&self) -> &[String] {
        &self.open_questions
    }

    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    pub fn recent_themes(&self) -> &[String] {
        &self.recent_themes
    }

    /// True once a non-blank throughline has been recorded.
    pub fn has_throughline(&self) -> bool {
        self.throughline.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Folds the significant words of `input` into the entity list.
    ///
    /// New entities go to the front in order of appearance; previously known
    /// entities follow. The list is truncated to [`MAX_ENTITIES`].
    pub fn update_entities(&mut self, input: &str) {
        let mut merged: Vec<String> = Vec::with_capacity(MAX_ENTITIES);
        for word in significant_words(input) {
            if !merged.contains(&word) {
                merged.push(word);
            }
        }
        for existing in self.entities.drain(..) {
            if !merged.contains(&existing) {
                merged.push(existing);
            }
        }
        merged.truncate(MAX_ENTITIES);
        self.entities = merged;
    }

    /// Applies a partial update, enforcing every cap.
    pub fn apply(&mut self, update: ScratchpadUpdate) {
        if let Some(goal) = update.goal {
            self.goal = non_blank(goal);
        }
        if let Some(throughline) = update.throughline {
            self.throughline = non_blank(throughline);
        }

        self.assumptions.extend(update.assumptions.into_iter().filter_map(non_blank));
        self.definitions.extend(update.definitions);
        self.acceptance_criteria.extend(update.acceptance_criteria);

        push_capped(&mut self.truths_in_tension, update.truths_in_tension, MAX_TENSIONS);
        push_capped(&mut self.open_questions, update.open_questions, MAX_OPEN_QUESTIONS);
        push_capped(&mut self.recent_themes, update.recent_themes, MAX_RECENT_THEMES);
    }

    pub(crate) fn record_move(&mut self, record: MoveRecord) {
        self.move_history.push(record);
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Appends non-blank items and keeps only the `cap` most recent.
fn push_capped(target: &mut Vec<String>, items: Vec<String>, cap: usize) {
    target.extend(items.into_iter().filter_map(non_blank));
    if target.len() > cap {
        let excess = target.len() - cap;
        target.drain(..excess);
    }
}
