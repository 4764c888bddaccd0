//! RCIP conversational-flow engine.
//!
//! Per user turn: [`Engine::process_user_input`] classifies the input into a
//! [`RcipState`] and [`Move`], then [`ResponseGenerator::generate_response`]
//! renders the matching template through the variation layer. Both halves
//! live in one [`RcipSession`] per conversation.

mod classifier;
mod engine;
mod move_selector;
mod moves;
mod patterns;
mod random;
mod response;
mod scratchpad;
mod session;
mod state;
mod template_engine;
mod templates;
mod variation;

pub use classifier::{current_state, IntentClassifier, IntentScores};
pub use engine::{next_state_hint, Engine, RcipResult, DEFAULT_MAX_TURNS};
pub use move_selector::MoveSelector;
pub use moves::{ClarificationMove, Move, PromptingMove, ReflectionMove, SynthesisMove};
pub use patterns::{
    normalized_words, significant_words, FingerprintPattern, IntentSignal, MoveRule,
    PatternCatalog, SIGNAL_WEIGHT, UNSTRUCTURED_FINGERPRINT,
};
pub use random::{pick, FixedRandom, RandomSource, SeededRandom, ThreadRandom};
pub use response::{Directive, DirectiveMetadata, ResponseGenerator};
pub use scratchpad::{
    MoveRecord, Scratchpad, ScratchpadUpdate, MAX_ENTITIES, MAX_OPEN_QUESTIONS,
    MAX_RECENT_THEMES, MAX_TENSIONS,
};
pub use session::{RcipSession, TurnOutcome};
pub use state::{ParseRcipError, RcipState};
pub use template_engine::{FilledTemplate, TemplateEngine};
pub use templates::{fallback_for, FallbackDirective, TemplateDefinition, TemplateLibrary};
pub use variation::{
    mirroring_overlap, AppliedVariation, VariationEngine, VariationState, VariedResponse,
};
