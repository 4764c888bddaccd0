//! Variation layer applied to every rendered template.
//!
//! Four stages run in a fixed order, each operating on the output of the
//! previous one: pattern breaking, tonal variation, insight escalation and
//! mirroring reduction. State is owned by one session.

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use crate::domain::conversation::ConversationHistory;

use super::patterns::{
    normalized_words, PatternCatalog, BREAKER_MAP, BREAKER_PHRASINGS, ESCALATION_ARCHETYPES,
    REFRAMING_PREAMBLES, TONE_PREFIXES,
};
use super::random::{pick, RandomSource, ThreadRandom};

/// Fingerprints remembered for repetition detection.
pub const PATTERN_HISTORY_LEN: usize = 5;

/// Tones remembered.
pub const TONE_HISTORY_LEN: usize = 4;

/// Tone fires on every render whose counter is a multiple of this.
pub const TONE_INTERVAL: u32 = 3;

/// History entries inspected for escalation.
///
/// Escalation is only evaluated once the history holds at least this many
/// entries, so the first turns of a session are never escalated.
pub const ESCALATION_WINDOW: usize = 2;

/// Overlap above which a draft counts as mirroring the user.
pub const MIRRORING_THRESHOLD: f64 = 0.7;

const BREAKER_GUARDRAIL: &str =
    "Deliver this as a deliberate change of pace. Do not return to the previous question shape.";

const DEFAULT_BREAKER_CATEGORY: &str = "pattern_naming";

/// One variation mechanism that fired on a render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppliedVariation {
    PatternBreaker { category: String },
    ToneShift { tone: String },
    InsightEscalation { archetype: String },
    MirroringReduction,
}

impl AppliedVariation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PatternBreaker { .. } => "pattern_breaker",
            Self::ToneShift { .. } => "tone_shift",
            Self::InsightEscalation { .. } => "insight_escalation",
            Self::MirroringReduction => "mirroring_reduction",
        }
    }
}

/// Per-session render memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariationState {
    pattern_history: VecDeque<&'static str>,
    tone_history: VecDeque<&'static str>,
    renders: u32,
}

impl VariationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent fingerprints, oldest first.
    pub fn pattern_history(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.pattern_history.iter().copied()
    }

    pub fn tone_history(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tone_history.iter().copied()
    }

    /// Renders seen so far.
    pub fn renders(&self) -> u32 {
        self.renders
    }

    /// Records `fingerprint` and reports whether it repeats the two previous renders.
    fn observe(&mut self, fingerprint: &'static str) -> bool {
        let n = self.pattern_history.len();
        let repeated = n >= 2
            && self
                .pattern_history
                .range(n - 2..)
                .all(|previous| *previous == fingerprint);

        push_bounded(&mut self.pattern_history, fingerprint, PATTERN_HISTORY_LEN);
        repeated
    }

    fn record_tone(&mut self, tone: &'static str) {
        push_bounded(&mut self.tone_history, tone, TONE_HISTORY_LEN);
    }
}

fn push_bounded<T>(queue: &mut VecDeque<T>, item: T, cap: usize) {
    queue.push_back(item);
    while queue.len() > cap {
        queue.pop_front();
    }
}

/// Text and guardrail after variation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariedResponse {
    pub text: String,
    pub guardrail: String,
    pub applied: Vec<AppliedVariation>,
}

/// Applies the variation stages for one session.
#[derive(Debug)]
pub struct VariationEngine {
    catalog: Arc<PatternCatalog>,
    random: Box<dyn RandomSource>,
    state: VariationState,
}

impl Default for VariationEngine {
    fn default() -> Self {
        Self::new(PatternCatalog::standard(), Box::new(ThreadRandom))
    }
}

impl VariationEngine {
    pub fn new(catalog: Arc<PatternCatalog>, random: Box<dyn RandomSource>) -> Self {
        Self {
            catalog,
            random,
            state: VariationState::new(),
        }
    }

    pub fn state(&self) -> &VariationState {
        &self.state
    }

    /// Clears render memory, keeping the random source.
    pub fn reset(&mut self) {
        self.state = VariationState::new();
    }

    /// Runs every stage over a rendered template.
    pub fn apply(
        &mut self,
        text: String,
        guardrail: String,
        user_input: &str,
        history: &ConversationHistory,
    ) -> VariedResponse {
        let mut out = VariedResponse {
            text,
            guardrail,
            applied: Vec::new(),
        };
        self.state.renders += 1;

        self.break_repetition(&mut out);
        self.vary_tone(&mut out);
        self.escalate(&mut out, history);
        self.reduce_mirroring(&mut out, user_input);

        if !out.applied.is_empty() {
            tracing::debug!(
                render = self.state.renders,
                applied = ?out.applied.iter().map(AppliedVariation::name).collect::<Vec<_>>(),
                "Applied response variations"
            );
        }
        out
    }

    fn break_repetition(&mut self, out: &mut VariedResponse) {
        let fingerprint = self.catalog.fingerprint(&out.text);
        if !self.state.observe(fingerprint) {
            return;
        }

        let category = BREAKER_MAP
            .iter()
            .find(|(fp, _)| *fp == fingerprint)
            .map(|(_, category)| *category)
            .unwrap_or(DEFAULT_BREAKER_CATEGORY);
        let phrasings = BREAKER_PHRASINGS
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, phrasings)| &phrasings[..])
            .unwrap_or(&[]);

        if let Some(phrase) = pick(self.random.as_mut(), phrasings) {
            out.text = (*phrase).to_string();
            out.guardrail = BREAKER_GUARDRAIL.to_string();
            out.applied.push(AppliedVariation::PatternBreaker {
                category: category.to_string(),
            });
        }
    }

    fn vary_tone(&mut self, out: &mut VariedResponse) {
        let render = self.state.renders;
        if render % TONE_INTERVAL != 0 {
            return;
        }
        let (tone, prefix) = TONE_PREFIXES[render as usize % TONE_PREFIXES.len()];
        out.text = format!("{prefix}{}", out.text);
        self.state.record_tone(tone);
        out.applied.push(AppliedVariation::ToneShift {
            tone: tone.to_string(),
        });
    }

    fn escalate(&mut self, out: &mut VariedResponse, history: &ConversationHistory) {
        if history.len() < ESCALATION_WINDOW {
            return;
        }
        let recent = &history[history.len() - ESCALATION_WINDOW..];
        let progressing = recent.iter().any(|message| {
            self.catalog.has_new_framing(message.content())
                || self.catalog.has_concrete_step(message.content())
        });
        if progressing {
            return;
        }

        if let Some((archetype, text)) = pick(self.random.as_mut(), &ESCALATION_ARCHETYPES) {
            out.text = (*text).to_string();
            out.applied.push(AppliedVariation::InsightEscalation {
                archetype: (*archetype).to_string(),
            });
        }
    }

    fn reduce_mirroring(&mut self, out: &mut VariedResponse, user_input: &str) {
        if mirroring_overlap(user_input, &out.text) <= MIRRORING_THRESHOLD {
            return;
        }
        if let Some(preamble) = pick(self.random.as_mut(), &REFRAMING_PREAMBLES) {
            out.text = format!("{preamble}{}", out.text);
            out.applied.push(AppliedVariation::MirroringReduction);
        }
    }
}

/// Share of the user's longer words that reappear in the response.
pub fn mirroring_overlap(user_input: &str, response: &str) -> f64 {
    let user_words: HashSet<String> = long_words(user_input);
    if user_words.is_empty() {
        return 0.0;
    }
    let response_words = long_words(response);
    let shared = user_words.intersection(&response_words).count();
    shared as f64 / user_words.len() as f64
}

/// Words longer than three characters. Stop words count here.
fn long_words(text: &str) -> HashSet<String> {
    normalized_words(text)
        .filter(|w| w.chars().count() > 3)
        .collect()
}
