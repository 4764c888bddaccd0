//! Intent classification.
//!
//! Scores every dialogue state against the catalog's intent signals, applies
//! the discretion penalty against interrogation loops, and resolves ties by
//! fixed priority.

use std::sync::Arc;

use super::patterns::PatternCatalog;
use super::scratchpad::MoveRecord;
use super::state::RcipState;

/// How many trailing moves the discretion penalty inspects.
pub const DISCRETION_WINDOW: usize = 3;

/// Clarification moves within the window that trigger the penalty.
pub const DISCRETION_THRESHOLD: usize = 2;

/// Subtracted from CLARIFICATION when the penalty applies.
pub const CLARIFICATION_PENALTY: i32 = 3;

/// Added to REFLECTION when the penalty applies.
pub const REFLECTION_BONUS: i32 = 1;

/// Per-state scores for one input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntentScores {
    pub prompting: i32,
    pub reflection: i32,
    pub clarification: i32,
    pub synthesis: i32,
}

impl IntentScores {
    pub fn get(&self, state: RcipState) -> i32 {
        match state {
            RcipState::Prompting => self.prompting,
            RcipState::Reflection => self.reflection,
            RcipState::Clarification => self.clarification,
            RcipState::Synthesis => self.synthesis,
        }
    }

    fn add(&mut self, state: RcipState, delta: i32) {
        let slot = match state {
            RcipState::Prompting => &mut self.prompting,
            RcipState::Reflection => &mut self.reflection,
            RcipState::Clarification => &mut self.clarification,
            RcipState::Synthesis => &mut self.synthesis,
        };
        *slot += delta;
    }

    /// Highest-scoring state, ties broken by [`RcipState::PRIORITY`].
    ///
    /// Returns `None` when no state scores above zero.
    pub fn winner(&self) -> Option<RcipState> {
        let best = RcipState::ALL.iter().map(|s| self.get(*s)).max()?;
        if best <= 0 {
            return None;
        }
        RcipState::PRIORITY
            .iter()
            .copied()
            .find(|state| self.get(*state) == best)
    }
}

/// Pure, deterministic state classifier.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    catalog: Arc<PatternCatalog>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(PatternCatalog::standard())
    }
}

impl IntentClassifier {
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        Self { catalog }
    }

    /// Raw signal scores plus the discretion penalty.
    pub fn score(&self, user_input: &str, recent_moves: &[MoveRecord]) -> IntentScores {
        let mut scores = IntentScores::default();
        for signal in self.catalog.intent_signals() {
            if signal.pattern.is_match(user_input) {
                scores.add(signal.state, signal.weight);
            }
        }

        if discretion_applies(recent_moves) {
            scores.add(RcipState::Clarification, -CLARIFICATION_PENALTY);
            scores.add(RcipState::Reflection, REFLECTION_BONUS);
        }
        scores
    }

    /// Selects the dialogue state for `user_input`.
    ///
    /// Falls back to the state of the last recorded move, or PROMPTING for a
    /// fresh conversation, when nothing scores above zero.
    pub fn detect_intent(&self, user_input: &str, recent_moves: &[MoveRecord]) -> RcipState {
        let scores = self.score(user_input, recent_moves);
        let state = scores
            .winner()
            .unwrap_or_else(|| current_state(recent_moves));

        tracing::debug!(
            ?scores,
            state = %state,
            "Classified user intent"
        );
        state
    }
}

/// State of the last recorded move, PROMPTING when there is none.
pub fn current_state(recent_moves: &[MoveRecord]) -> RcipState {
    recent_moves
        .last()
        .map(|record| record.state)
        .unwrap_or_default()
}

fn discretion_applies(recent_moves: &[MoveRecord]) -> bool {
    let window_start = recent_moves.len().saturating_sub(DISCRETION_WINDOW);
    recent_moves[window_start..]
        .iter()
        .filter(|record| record.state == RcipState::Clarification)
        .count()
        >= DISCRETION_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rcip::moves::Move;

    fn history(states: &[RcipState]) -> Vec<MoveRecord> {
        states
            .iter()
            .enumerate()
            .map(|(i, state)| MoveRecord::new(i as u32 + 1, Move::default_for(*state), "earlier"))
            .collect()
    }

    mod scoring {
        use super::*;

        #[test]
        fn each_signal_counts_once() {
            let classifier = IntentClassifier::default();
            let scores = classifier.score("I'm not sure. Not sure at all.", &[]);
            assert_eq!(scores.clarification, 2);
        }

        #[test]
        fn scenario_input_scores_two_clarification_signals() {
            let classifier = IntentClassifier::default();
            let scores = classifier.score("I'm not sure what we mean by scope", &[]);
            assert_eq!(scores.clarification, 4);
            assert_eq!(scores.reflection, 0);
        }

        #[test]
        fn winner_is_none_when_all_scores_non_positive() {
            let scores = IntentScores {
                clarification: -1,
                ..Default::default()
            };
            assert_eq!(scores.winner(), None);
        }

        #[test]
        fn ties_follow_priority_order() {
            let scores = IntentScores {
                prompting: 2,
                reflection: 2,
                clarification: 2,
                synthesis: 2,
            };
            assert_eq!(scores.winner(), Some(RcipState::Clarification));

            let scores = IntentScores {
                prompting: 2,
                synthesis: 2,
                ..Default::default()
            };
            assert_eq!(scores.winner(), Some(RcipState::Synthesis));
        }
    }

    mod detect_intent {
        use super::*;

        #[test]
        fn unmatched_input_on_fresh_conversation_is_prompting() {
            let classifier = IntentClassifier::default();
            assert_eq!(classifier.detect_intent("ok", &[]), RcipState::Prompting);
        }

        #[test]
        fn unmatched_input_keeps_current_state() {
            let classifier = IntentClassifier::default();
            let moves = history(&[RcipState::Prompting, RcipState::Synthesis]);
            assert_eq!(classifier.detect_intent("ok", &moves), RcipState::Synthesis);
        }

        #[test]
        fn uncertainty_classifies_as_clarification() {
            let classifier = IntentClassifier::default();
            assert_eq!(
                classifier.detect_intent("I'm not sure what we mean by scope", &[]),
                RcipState::Clarification
            );
        }

        #[test]
        fn discretion_penalty_breaks_interrogation_loop() {
            let classifier = IntentClassifier::default();
            let input = "I'm not sure, I feel like this keeps happening";

            assert_eq!(classifier.detect_intent(input, &[]), RcipState::Clarification);

            let moves = history(&[
                RcipState::Clarification,
                RcipState::Clarification,
                RcipState::Clarification,
            ]);
            assert_eq!(classifier.detect_intent(input, &moves), RcipState::Reflection);
        }

        #[test]
        fn penalty_only_looks_at_last_three_moves() {
            let classifier = IntentClassifier::default();
            let input = "I'm not sure, I feel like this keeps happening";
            let moves = history(&[
                RcipState::Clarification,
                RcipState::Clarification,
                RcipState::Prompting,
                RcipState::Prompting,
                RcipState::Clarification,
            ]);
            assert_eq!(classifier.detect_intent(input, &moves), RcipState::Clarification);
        }

        #[test]
        fn classification_is_deterministic() {
            let classifier = IntentClassifier::default();
            let moves = history(&[RcipState::Reflection]);
            let first = classifier.detect_intent("so the real issue is trust", &moves);
            for _ in 0..10 {
                assert_eq!(
                    classifier.detect_intent("so the real issue is trust", &moves),
                    first
                );
            }
        }
    }

    #[test]
    fn custom_catalog_drives_scoring() {
        let catalog = PatternCatalog::compile(
            &[(RcipState::Synthesis, r"\bbanana\b", 5)],
            &[],
        )
        .unwrap();
        let classifier = IntentClassifier::new(Arc::new(catalog));
        assert_eq!(classifier.detect_intent("BANANA", &[]), RcipState::Synthesis);
        assert_eq!(classifier.detect_intent("I'm not sure", &[]), RcipState::Prompting);
    }
}
