//! Session-close analysis: phases, prompts, placeholders and result types.
//!
//! Everything here is pure. The asynchronous pipeline that drives a text
//! generator through these phases lives in the application layer.

mod arc;
mod extraction;
mod phase;
mod placeholders;
mod prompts;
mod result;

pub use arc::{ConversationArc, EngagementLevel, EvolutionPattern};
pub use extraction::{ExtractionError, JsonExtractor, MAX_FIELD_LENGTH, MAX_RESPONSE_LENGTH};
pub use phase::{AnalysisPhase, PhaseResult, PhaseSource};
pub use placeholders::{
    placeholder_data, placeholder_result, EMPTY_BREAKTHROUGH, EMPTY_NEXT_STEP, EMPTY_THROUGHLINE,
};
pub use prompts::{phase_prompt, synthesis_prompt, ANALYSIS_SYSTEM_PROMPT};
pub use result::{key_insights, PipelinePhases, PipelineResult, SessionMetadata};
