//! Pattern catalog: every lexicon the RCIP engine matches against.
//!
//! Classification and extraction code never embeds a pattern. Everything is
//! declared here as ordered tables and compiled once into a
//! [`PatternCatalog`]; the classifier, move selector, template engine and
//! variation engine are generic consumers of those tables.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::sync::Arc;

use super::moves::{
    ClarificationMove, Move, PromptingMove, ReflectionMove, SynthesisMove,
};
use super::state::RcipState;

/// Score added for each matched intent signal.
pub const SIGNAL_WEIGHT: i32 = 2;

// ============================================================================
// Intent signals: (state, pattern, weight)
// ============================================================================

const INTENT_SIGNALS: &[(RcipState, &str, i32)] = &[
    // Prompting
    (RcipState::Prompting, r"\bwhere (?:do|should) i (?:start|begin)\b", SIGNAL_WEIGHT),
    (RcipState::Prompting, r"\bhelp me (?:think|figure|work)\b", SIGNAL_WEIGHT),
    (RcipState::Prompting, r"\bi(?: want| would like|['’]d like) to\b", SIGNAL_WEIGHT),
    (RcipState::Prompting, r"\bi['’]?m stuck\b|\bstuck on\b", SIGNAL_WEIGHT),
    (RcipState::Prompting, r"\bi don['’]?t know where\b", SIGNAL_WEIGHT),
    (RcipState::Prompting, r"\b(?:new idea|been wondering)\b", SIGNAL_WEIGHT),
    // Reflection
    (RcipState::Reflection, r"\bi (?:feel|felt)\b", SIGNAL_WEIGHT),
    (RcipState::Reflection, r"\bi (?:notice|noticed|realize|realized)\b", SIGNAL_WEIGHT),
    (RcipState::Reflection, r"\bi (?:always|keep|tend to)\b", SIGNAL_WEIGHT),
    (RcipState::Reflection, r"\bpattern\b", SIGNAL_WEIGHT),
    (RcipState::Reflection, r"\blooking back\b", SIGNAL_WEIGHT),
    (RcipState::Reflection, r"\bit seems like\b", SIGNAL_WEIGHT),
    // Clarification
    (RcipState::Clarification, r"\b(?:i['’]?m )?not sure\b", SIGNAL_WEIGHT),
    (
        RcipState::Clarification,
        r"\bwhat (?:do |does )?(?:we|you|i|it) mean by\b",
        SIGNAL_WEIGHT,
    ),
    (RcipState::Clarification, r"\bconfus(?:ed|ing)\b", SIGNAL_WEIGHT),
    (RcipState::Clarification, r"\bunclear\b", SIGNAL_WEIGHT),
    (RcipState::Clarification, r"\bwhich (?:one|option)\b", SIGNAL_WEIGHT),
    (RcipState::Clarification, r"\bwhat does .+ mean\b", SIGNAL_WEIGHT),
    // Synthesis
    (RcipState::Synthesis, r"\bso (?:the|what) .+ (?:is|means)\b", SIGNAL_WEIGHT),
    (RcipState::Synthesis, r"\b(?:in summary|to sum up|bottom line)\b", SIGNAL_WEIGHT),
    (RcipState::Synthesis, r"\bnext step\b", SIGNAL_WEIGHT),
    (
        RcipState::Synthesis,
        r"\bwhat (?:this|it) (?:all )?(?:comes down to|means)\b",
        SIGNAL_WEIGHT,
    ),
    (RcipState::Synthesis, r"\bthe (?:real|core) (?:issue|point|thing)\b", SIGNAL_WEIGHT),
    (RcipState::Synthesis, r"\bready to (?:decide|commit|move)\b", SIGNAL_WEIGHT),
];

// ============================================================================
// Move rules: (pattern, move), first match wins within a state
// ============================================================================

const MOVE_RULES: &[(&str, Move)] = &[
    // Prompting
    (
        r"\b(?:stuck|blocked|can['’]?t|cannot)\b",
        Move::Prompting(PromptingMove::StuckPoint),
    ),
    (
        r"\b(?:must|need to|have to|deadline|budget|constraint)\b",
        Move::Prompting(PromptingMove::ConstraintProbe),
    ),
    (
        r"\b(?:as a|manager|founder|parent|teacher|engineer|leader)\b",
        Move::Prompting(PromptingMove::RoleLens),
    ),
    (
        r"\b(?:goal|want|hope|aim|trying to)\b",
        Move::Prompting(PromptingMove::GoalProbe),
    ),
    // Reflection
    (
        r"\b(?:always|often|usually|keep|never)\b",
        Move::Reflection(ReflectionMove::MirrorPattern),
    ),
    (
        r"\b(?:but|however|although|yet)\b",
        Move::Reflection(ReflectionMove::TensionName),
    ),
    (
        r"\b(?:assume|assuming|suppose|probably|should)\b",
        Move::Reflection(ReflectionMove::AssumptionSurface),
    ),
    // Clarification
    (
        r"\bvs\b|\bversus\b|\beither\b.+\bor\b",
        Move::Clarification(ClarificationMove::BinaryFork),
    ),
    (
        r"\b(?:track|on course|direction)\b",
        Move::Clarification(ClarificationMove::TrackCheck),
    ),
    (
        r"\b(?:judge|criteria|measure)\b",
        Move::Clarification(ClarificationMove::CriteriaCheck),
    ),
    (
        r"\b(?:scattered|all over|too many)\b",
        Move::Clarification(ClarificationMove::ThreadPick),
    ),
    // Synthesis
    (
        r"\bnext step|\bwhat now\b|\bwhere do (?:i|we) go\b",
        Move::Synthesis(SynthesisMove::NextStep),
    ),
    (
        r"\bdone when\b|\bsuccess looks\b|\bhow (?:do|will) (?:i|we) know\b",
        Move::Synthesis(SynthesisMove::AcceptanceTest),
    ),
    (
        r"\bthroughline\b|\bcommon thread\b|\bconnects?\b",
        Move::Synthesis(SynthesisMove::ThroughlineDraft),
    ),
    (
        r"\btension\b|\btrade-?off\b|\btorn\b",
        Move::Synthesis(SynthesisMove::TensionResolve),
    ),
    (
        r"\bbreakthrough\b|\bclick(?:ed|s)?\b|\bfinally see\b",
        Move::Synthesis(SynthesisMove::BreakthroughFrame),
    ),
];

// ============================================================================
// Structural fingerprints, in match order
// ============================================================================

const FINGERPRINTS: &[(&str, &str)] = &[
    ("tension_choice", r"\bvs\b|\bversus\b|\bwhich matters more\b"),
    ("most_people", r"\bmost people\b"),
    ("what_if", r"\bwhat if\b"),
    ("you_said", r"\byou(?:['’]ve)? (?:said|mentioned|keep saying)\b"),
    ("lets_name", r"\blet['’]?s name\b|\bname (?:it|this)\b"),
    ("underneath", r"\bunderneath\b|\bbeneath\b|\bunder the surface\b"),
    ("core_question", r"\b(?:real|core) question\b"),
];

/// Fingerprint reported when no structural pattern matches.
pub const UNSTRUCTURED_FINGERPRINT: &str = "unstructured";

const NEW_FRAMING_SIGNALS: &[&str] = &[
    r"\bwhat if\b.*\binstead\b",
    r"\breal\b.*\bquestion\b",
    r"\bdeeper\b.*\bissue\b",
    r"\bpattern\b.*\bof\b",
    r"\breframe\b",
];

const CONCRETE_STEP_SIGNALS: &[&str] = &[
    r"\bnext step\b",
    r"\btry\b.*\bthis\b",
    r"\bstart\b.*\bwith\b",
    r"\btomorrow\b",
    r"\bfirst\b.*\bthing\b",
];

// ============================================================================
// Extraction lexicons
// ============================================================================

/// Words ignored when picking entities and content words.
pub const STOP_WORDS: &[&str] = &[
    "about", "actually", "after", "again", "also", "because", "been", "before", "being",
    "could", "didn't", "does", "doesn't", "doing", "don't", "even", "feel", "from", "have",
    "having", "here", "i'm", "i've", "into", "it's", "just", "know", "like", "maybe",
    "mean", "more", "much", "need", "really", "should", "some", "something", "still",
    "sure", "than", "that", "that's", "their", "them", "then", "there", "these", "they",
    "thing", "things", "think", "this", "those", "very", "want", "were", "what", "when",
    "where", "which", "while", "will", "with", "would", "your",
];

/// Role nouns recognised by `role` slots.
pub const ROLE_VOCABULARY: &[&str] = &[
    "manager", "founder", "parent", "teacher", "engineer", "designer", "leader",
    "student", "writer", "developer", "partner", "owner", "coach", "researcher", "nurse",
];

const CONTRAST_CONJUNCTIONS: &str = r"\b(?:but|however|although|though|yet|whereas)\b";

const FREQUENCY_ADVERBS: &str =
    r"\b(always|often|usually|never|constantly|sometimes|keep)\b";

const OBLIGATION_KEYWORDS: &str =
    r"\b(?:must|need to|needs to|have to|has to|should|required to)\b";

const BINARY_CHOICES: &[&str] = &[
    r"([\w'-]+)\s+(?:vs\.?|versus)\s+([\w'-]+)",
    r"\beither\s+([^.,;?!]+?)\s+or\s+([^.,;?!]+)",
    r"([\w'-]+)\s+and\s+([\w'-]+)",
];

const EMPHASIS: &str = r#""([^"]+)"|“([^”]+)”|\*([^*]+)\*|\b_([^_]+)_\b"#;

// ============================================================================
// Canned phrasings used by the variation engine
// ============================================================================

/// Alternative phrasings per breaker category.
pub const BREAKER_PHRASINGS: &[(&str, [&str; 3])] = &[
    (
        "direct_challenge",
        [
            "Let me push back: what are you avoiding by keeping this abstract?",
            "Straight question: what would you do today if nobody were watching?",
            "I'll be blunt: which part of this do you already know the answer to?",
        ],
    ),
    (
        "pattern_naming",
        [
            "I notice we keep circling the same shape. What would break the loop?",
            "We've been looping. What is the one thing you haven't said out loud yet?",
            "This conversation has a rhythm now. What would it look like to interrupt it?",
        ],
    ),
    (
        "hypothesis_testing",
        [
            "Here's a hypothesis to test: the obstacle isn't the plan, it's the permission. True or false?",
            "Try this on: you already chose, and you're looking for reasons. How close is that?",
            "Test this guess: the hard part is the first conversation, not the work. Right or wrong?",
        ],
    ),
    (
        "analogy_reframe",
        [
            "If this were a house, which room are we standing in, and which door haven't we opened?",
            "Think of it like a river: where is the current actually pulling you?",
            "If this were a chess game, what is the move you keep not making?",
        ],
    ),
];

/// Fingerprint to breaker category.
pub const BREAKER_MAP: &[(&str, &str)] = &[
    ("tension_choice", "direct_challenge"),
    ("most_people", "pattern_naming"),
    ("what_if", "hypothesis_testing"),
    ("you_said", "analogy_reframe"),
    ("lets_name", "direct_challenge"),
    ("underneath", "analogy_reframe"),
    ("core_question", "hypothesis_testing"),
    (UNSTRUCTURED_FINGERPRINT, "pattern_naming"),
];

/// Tone prefixes, indexed by `turn % 4`.
pub const TONE_PREFIXES: [(&str, &str); 4] = [
    ("empathetic", "That sounds like a lot to hold. "),
    ("pragmatic", "Let's keep this practical. "),
    ("provocative", "Here's a sharper angle. "),
    ("metaphorical", "Picture this for a moment. "),
];

/// Escalation archetypes and their forced replacement text.
pub const ESCALATION_ARCHETYPES: [(&str, &str); 3] = [
    (
        "synthesis_push",
        "We've gathered enough to commit. In one sentence, what is this really about?",
    ),
    (
        "throughline_attempt",
        "Let me attempt a throughline: the same concern keeps surfacing in different clothes. What is it wearing today?",
    ),
    (
        "meta_observation",
        "Stepping back: we've been exploring without landing. What would make the next five minutes useful?",
    ),
];

/// Preambles used when a draft mirrors the user's wording too closely.
pub const REFRAMING_PREAMBLES: [&str; 5] = [
    "Let me come at this from a different side. ",
    "Setting your exact words aside for a moment: ",
    "Rather than repeat that back, ",
    "Here's a different angle on what you said. ",
    "Turning this over once more: ",
];

// ============================================================================
// Compiled catalog
// ============================================================================

/// A scored signal for one dialogue state.
#[derive(Debug, Clone)]
pub struct IntentSignal {
    pub state: RcipState,
    pub pattern: Regex,
    pub weight: i32,
}

/// A first-match-wins dispatch rule for move selection.
#[derive(Debug, Clone)]
pub struct MoveRule {
    pub pattern: Regex,
    pub target: Move,
}

/// A named structural pattern used to fingerprint rendered templates.
#[derive(Debug, Clone)]
pub struct FingerprintPattern {
    pub name: &'static str,
    pub pattern: Regex,
}

/// Compiled, case-insensitive pattern tables.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    intent_signals: Vec<IntentSignal>,
    move_rules: Vec<MoveRule>,
    fingerprints: Vec<FingerprintPattern>,
    new_framing: Vec<Regex>,
    concrete_step: Vec<Regex>,
    contrast: Regex,
    frequency: Regex,
    obligation: Regex,
    binary_choices: Vec<Regex>,
    emphasis: Regex,
}

static STANDARD: Lazy<Arc<PatternCatalog>> = Lazy::new(|| {
    Arc::new(
        PatternCatalog::compile(INTENT_SIGNALS, MOVE_RULES)
            .expect("built-in RCIP pattern tables must compile"),
    )
});

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| compile(p)).collect()
}

impl PatternCatalog {
    /// Returns the shared built-in catalog.
    pub fn standard() -> Arc<PatternCatalog> {
        Arc::clone(&STANDARD)
    }

    /// Compiles a catalog from custom intent and move tables.
    ///
    /// Extraction lexicons and fingerprints always come from the built-in
    /// tables.
    pub fn compile(
        intent_signals: &[(RcipState, &str, i32)],
        move_rules: &[(&str, Move)],
    ) -> Result<Self, regex::Error> {
        let intent_signals = intent_signals
            .iter()
            .map(|(state, pattern, weight)| {
                Ok(IntentSignal {
                    state: *state,
                    pattern: compile(pattern)?,
                    weight: *weight,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let move_rules = move_rules
            .iter()
            .map(|(pattern, target)| {
                Ok(MoveRule {
                    pattern: compile(pattern)?,
                    target: *target,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        let fingerprints = FINGERPRINTS
            .iter()
            .map(|(name, pattern)| {
                Ok(FingerprintPattern {
                    name: *name,
                    pattern: compile(pattern)?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self {
            intent_signals,
            move_rules,
            fingerprints,
            new_framing: compile_all(NEW_FRAMING_SIGNALS)?,
            concrete_step: compile_all(CONCRETE_STEP_SIGNALS)?,
            contrast: compile(CONTRAST_CONJUNCTIONS)?,
            frequency: compile(FREQUENCY_ADVERBS)?,
            obligation: compile(OBLIGATION_KEYWORDS)?,
            binary_choices: compile_all(BINARY_CHOICES)?,
            emphasis: compile(EMPHASIS)?,
        })
    }

    /// All intent signals, in table order.
    pub fn intent_signals(&self) -> &[IntentSignal] {
        &self.intent_signals
    }

    /// Move rules owned by one state, in evaluation order.
    pub fn move_rules_for(&self, state: RcipState) -> impl Iterator<Item = &MoveRule> {
        self.move_rules
            .iter()
            .filter(move |rule| rule.target.state() == state)
    }

    /// Name of the first structural pattern matching `text`.
    pub fn fingerprint(&self, text: &str) -> &'static str {
        self.fingerprints
            .iter()
            .find(|fp| fp.pattern.is_match(text))
            .map(|fp| fp.name)
            .unwrap_or(UNSTRUCTURED_FINGERPRINT)
    }

    /// True if `text` offers a new framing.
    pub fn has_new_framing(&self, text: &str) -> bool {
        self.new_framing.iter().any(|re| re.is_match(text))
    }

    /// True if `text` proposes a concrete next step.
    pub fn has_concrete_step(&self, text: &str) -> bool {
        self.concrete_step.iter().any(|re| re.is_match(text))
    }

    pub fn contrast(&self) -> &Regex {
        &self.contrast
    }

    pub fn frequency(&self) -> &Regex {
        &self.frequency
    }

    pub fn obligation(&self) -> &Regex {
        &self.obligation
    }

    /// Binary-choice shapes in priority order (`X vs Y`, `either X or Y`, `X and Y`).
    pub fn binary_choices(&self) -> &[Regex] {
        &self.binary_choices
    }

    pub fn emphasis(&self) -> &Regex {
        &self.emphasis
    }
}

/// Returns true if `word` (lowercase) is in the stop list.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Splits on whitespace and trims surrounding punctuation, lowercased.
///
/// Inner apostrophes and hyphens are kept (`don't`, `follow-up`).
pub fn normalized_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|token| {
            token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .replace('’', "'")
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
}

/// Words longer than three characters that are not stop words.
pub fn significant_words(text: &str) -> impl Iterator<Item = String> + '_ {
    normalized_words(text).filter(|w| w.chars().count() > 3 && !is_stop_word(w))
}
