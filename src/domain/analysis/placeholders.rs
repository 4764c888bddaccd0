//! Deterministic phase data used when generation is unavailable or fails.

use serde_json::{json, Map, Value};

use super::phase::{AnalysisPhase, PhaseResult};

/// Throughline reported for transcripts without user content.
pub const EMPTY_THROUGHLINE: &str = "Session was too brief for meaningful synthesis";

pub const EMPTY_BREAKTHROUGH: &str = "No breakthrough captured yet";

pub const EMPTY_NEXT_STEP: &str = "Start a longer conversation to explore your thinking";

/// Canned data for `phase`.
pub fn placeholder_data(phase: AnalysisPhase) -> Map<String, Value> {
    let value = match phase {
        AnalysisPhase::Prompting => json!({
            "primaryExploration": "Exploring the question that opened the session",
            "initialQuestions": ["What matters most here?"],
            "explorationDepth": "surface",
        }),
        AnalysisPhase::Reflection => json!({
            "coreTension": "Balancing what is wanted against what feels possible",
            "emergingPatterns": ["Returning to the same concern from different angles"],
            "assumptions": ["The current constraints are fixed"],
        }),
        AnalysisPhase::Clarification => json!({
            "keyTerms": ["goal", "constraint"],
            "clarifiedConcepts": [],
            "remainingAmbiguity": "What success would look like in concrete terms",
        }),
        AnalysisPhase::Synthesis => json!({
            "throughline": "The conversation kept circling one question worth continuing",
            "breakthrough": "Naming the question was the first step toward answering it",
            "nextStep": "Write down the question in one sentence and revisit it tomorrow",
        }),
    };

    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Placeholder-sourced result for `phase`.
pub fn placeholder_result(phase: AnalysisPhase) -> PhaseResult {
    PhaseResult::placeholder(placeholder_data(phase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_carry_every_expected_key() {
        for phase in AnalysisPhase::ALL {
            let data = placeholder_data(phase);
            for key in phase.expected_keys() {
                assert!(data.contains_key(*key), "{phase} placeholder lacks {key}");
            }
        }
    }

    #[test]
    fn placeholders_are_deterministic() {
        for phase in AnalysisPhase::ALL {
            assert_eq!(placeholder_result(phase), placeholder_result(phase));
            assert!(placeholder_result(phase).is_placeholder());
        }
    }
}
