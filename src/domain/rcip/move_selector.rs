//! Sub-move selection within a dialogue state.

use std::sync::Arc;

use super::moves::Move;
use super::patterns::PatternCatalog;
use super::state::RcipState;

/// First-match-wins dispatcher over the catalog's move rules.
#[derive(Debug, Clone)]
pub struct MoveSelector {
    catalog: Arc<PatternCatalog>,
}

impl Default for MoveSelector {
    fn default() -> Self {
        Self::new(PatternCatalog::standard())
    }
}

impl MoveSelector {
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        Self { catalog }
    }

    /// Picks the move for `state`, falling back to the state's default move.
    pub fn detect_move(&self, state: RcipState, user_input: &str) -> Move {
        self.catalog
            .move_rules_for(state)
            .find(|rule| rule.pattern.is_match(user_input))
            .map(|rule| rule.target)
            .unwrap_or_else(|| Move::default_for(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rcip::moves::{
        ClarificationMove, PromptingMove, ReflectionMove, SynthesisMove,
    };

    #[test]
    fn falls_back_to_state_default() {
        let selector = MoveSelector::default();
        assert_eq!(
            selector.detect_move(RcipState::Clarification, "I'm not sure what we mean by scope"),
            Move::Clarification(ClarificationMove::SingleNeedle)
        );
        assert_eq!(
            selector.detect_move(RcipState::Synthesis, "hmm"),
            Move::Synthesis(SynthesisMove::ColdCore)
        );
    }

    #[test]
    fn binary_choice_selects_binary_fork() {
        let selector = MoveSelector::default();
        assert_eq!(
            selector.detect_move(RcipState::Clarification, "speed vs quality"),
            Move::Clarification(ClarificationMove::BinaryFork)
        );
        assert_eq!(
            selector.detect_move(RcipState::Clarification, "either we hire or we wait"),
            Move::Clarification(ClarificationMove::BinaryFork)
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        let selector = MoveSelector::default();
        // "stuck" precedes "deadline" in rule order.
        assert_eq!(
            selector.detect_move(RcipState::Prompting, "I'm stuck and the deadline is Friday"),
            Move::Prompting(PromptingMove::StuckPoint)
        );
        assert_eq!(
            selector.detect_move(RcipState::Prompting, "the deadline is Friday"),
            Move::Prompting(PromptingMove::ConstraintProbe)
        );
    }

    #[test]
    fn rules_of_other_states_are_ignored() {
        let selector = MoveSelector::default();
        // "vs" is a clarification cue; in reflection it means nothing.
        assert_eq!(
            selector.detect_move(RcipState::Reflection, "speed vs quality"),
            Move::Reflection(ReflectionMove::ThreadWeave)
        );
    }

    #[test]
    fn selected_move_always_belongs_to_state() {
        let selector = MoveSelector::default();
        let inputs = [
            "",
            "I always fail but I should try",
            "what is the next step",
            "too many threads, all over the place",
            "as a manager I have to decide",
        ];
        for state in RcipState::ALL {
            for input in inputs {
                assert_eq!(selector.detect_move(state, input).state(), state);
            }
        }
    }
}
