//! Prompt construction for each analysis phase.
//!
//! The first three phases see only the concatenated user text. Synthesis
//! additionally sees the results of those three phases.

use super::phase::{AnalysisPhase, PhaseResult};

/// System prompt sent with every phase request.
pub const ANALYSIS_SYSTEM_PROMPT: &str = "You analyze coaching conversations. \
Respond with a single JSON object and nothing else. Use only the keys you are asked for.";

fn instructions(phase: AnalysisPhase) -> &'static str {
    match phase {
        AnalysisPhase::Prompting => {
            "Identify what the person set out to explore, the questions they opened with, \
and how deep the exploration went (surface, moderate or deep)."
        }
        AnalysisPhase::Reflection => {
            "Identify the central tension in what the person said, recurring patterns in \
how they talk about it, and the assumptions they are making."
        }
        AnalysisPhase::Clarification => {
            "Identify the key terms the person relies on, the concepts that became clearer, \
and what remains ambiguous."
        }
        AnalysisPhase::Synthesis => {
            "Using the earlier analysis, state the throughline that connects the session, \
the breakthrough in one sentence, and one concrete next step."
        }
    }
}

fn key_list(phase: AnalysisPhase) -> String {
    phase
        .expected_keys()
        .iter()
        .map(|k| format!("\"{k}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn header(phase: AnalysisPhase, topic: Option<&str>) -> String {
    let mut out = format!("Phase: {phase}\n{}\n", instructions(phase));
    if let Some(topic) = topic.filter(|t| !t.trim().is_empty()) {
        out.push_str(&format!("Session topic: {}\n", topic.trim()));
    }
    out
}

/// Prompt for one of the three transcript-only phases.
pub fn phase_prompt(phase: AnalysisPhase, user_text: &str, topic: Option<&str>) -> String {
    format!(
        "{}\nWhat the person said:\n\"\"\"\n{}\n\"\"\"\n\nReturn JSON with keys {}.",
        header(phase, topic),
        user_text,
        key_list(phase)
    )
}

/// Prompt for the synthesis phase, embedding the earlier results.
pub fn synthesis_prompt(
    user_text: &str,
    topic: Option<&str>,
    prompting: &PhaseResult,
    reflection: &PhaseResult,
    clarification: &PhaseResult,
) -> String {
    format!(
        "{}\nWhat the person said:\n\"\"\"\n{}\n\"\"\"\n\n\
Prompting analysis: {}\nReflection analysis: {}\nClarification analysis: {}\n\n\
Return JSON with keys {}.",
        header(AnalysisPhase::Synthesis, topic),
        user_text,
        prompting.to_prompt_text(),
        reflection.to_prompt_text(),
        clarification.to_prompt_text(),
        key_list(AnalysisPhase::Synthesis)
    )
}
