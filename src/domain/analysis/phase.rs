//! Analysis phases and their results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One of the four sequential analysis phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisPhase {
    Prompting,
    Reflection,
    Clarification,
    Synthesis,
}

impl AnalysisPhase {
    /// Phases in execution order.
    pub const ALL: [AnalysisPhase; 4] = [
        AnalysisPhase::Prompting,
        AnalysisPhase::Reflection,
        AnalysisPhase::Clarification,
        AnalysisPhase::Synthesis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prompting => "prompting",
            Self::Reflection => "reflection",
            Self::Clarification => "clarification",
            Self::Synthesis => "synthesis",
        }
    }

    /// JSON keys a result for this phase is expected to carry.
    pub fn expected_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Prompting => &["primaryExploration", "initialQuestions", "explorationDepth"],
            Self::Reflection => &["coreTension", "emergingPatterns", "assumptions"],
            Self::Clarification => &["keyTerms", "clarifiedConcepts", "remainingAmbiguity"],
            Self::Synthesis => &["throughline", "breakthrough", "nextStep"],
        }
    }
}

impl fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a phase result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseSource {
    /// Parsed from text-generator output.
    Generated,
    /// Deterministic canned data.
    Placeholder,
    /// Not run because the transcript had no user content.
    Skipped,
}

/// Serialized name of the source tag; phase data may not use it.
const SOURCE_KEY: &str = "source";

/// Structured output of one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseResult {
    pub source: PhaseSource,
    /// Phase-specific keys, e.g. `coreTension`.
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl PhaseResult {
    pub fn generated(data: Map<String, Value>) -> Self {
        Self::tagged(PhaseSource::Generated, data)
    }

    pub fn placeholder(data: Map<String, Value>) -> Self {
        Self::tagged(PhaseSource::Placeholder, data)
    }

    fn tagged(source: PhaseSource, mut data: Map<String, Value>) -> Self {
        data.remove(SOURCE_KEY);
        Self { source, data }
    }

    pub fn skipped() -> Self {
        Self {
            source: PhaseSource::Skipped,
            data: Map::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.source == PhaseSource::Placeholder
    }

    /// Non-blank string value of `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.data
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Non-blank string items of `key`.
    ///
    /// A plain string is treated as a one-item list.
    pub fn list(&self, key: &str) -> Vec<&str> {
        match self.data.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim()],
            _ => Vec::new(),
        }
    }

    /// Renders the data as compact JSON for embedding in later prompts.
    pub fn to_prompt_text(&self) -> String {
        Value::Object(self.data.clone()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(value: Value) -> PhaseResult {
        match value {
            Value::Object(map) => PhaseResult::generated(map),
            _ => panic!("test data must be an object"),
        }
    }

    #[test]
    fn text_ignores_blank_and_non_string_values() {
        let r = result(json!({"a": "  hi ", "b": "   ", "c": 3}));
        assert_eq!(r.text("a"), Some("hi"));
        assert_eq!(r.text("b"), None);
        assert_eq!(r.text("c"), None);
        assert_eq!(r.text("missing"), None);
    }

    #[test]
    fn list_accepts_arrays_and_single_strings() {
        let r = result(json!({"xs": ["a", "", 1, "b"], "one": "solo"}));
        assert_eq!(r.list("xs"), vec!["a", "b"]);
        assert_eq!(r.list("one"), vec!["solo"]);
        assert!(r.list("missing").is_empty());
    }

    #[test]
    fn serializes_source_beside_flattened_data() {
        let r = result(json!({"coreTension": "speed vs care"}));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json, json!({"source": "generated", "coreTension": "speed vs care"}));
    }

    #[test]
    fn data_cannot_shadow_source_tag() {
        let r = result(json!({"source": "placeholder", "throughline": "trust"}));
        assert!(!r.data.contains_key("source"));

        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json.matches("\"source\"").count(), 1);

        let back: PhaseResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
        assert_eq!(back.source, PhaseSource::Generated);
    }

    #[test]
    fn every_phase_has_three_expected_keys() {
        for phase in AnalysisPhase::ALL {
            assert_eq!(phase.expected_keys().len(), 3);
        }
    }
}
