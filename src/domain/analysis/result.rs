//! Pipeline input metadata and output types.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::SessionId;

use super::arc::ConversationArc;
use super::phase::{AnalysisPhase, PhaseResult};
use super::placeholders::{
    placeholder_data, EMPTY_BREAKTHROUGH, EMPTY_NEXT_STEP, EMPTY_THROUGHLINE,
};

/// Caller-supplied context for an analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionMetadata {
    pub session_id: Option<SessionId>,
    /// Optional subject line included in phase prompts.
    pub topic: Option<String>,
}

impl SessionMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_session(session_id: SessionId) -> Self {
        Self {
            session_id: Some(session_id),
            topic: None,
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }
}

/// The four phase results of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelinePhases {
    pub prompting: PhaseResult,
    pub reflection: PhaseResult,
    pub clarification: PhaseResult,
    pub synthesis: PhaseResult,
}

impl PipelinePhases {
    pub fn get(&self, phase: AnalysisPhase) -> &PhaseResult {
        match phase {
            AnalysisPhase::Prompting => &self.prompting,
            AnalysisPhase::Reflection => &self.reflection,
            AnalysisPhase::Clarification => &self.clarification,
            AnalysisPhase::Synthesis => &self.synthesis,
        }
    }

    /// Number of phases whose data is canned.
    pub fn placeholder_count(&self) -> usize {
        AnalysisPhase::ALL
            .iter()
            .filter(|p| self.get(**p).is_placeholder())
            .count()
    }
}

/// Full synthesis of a closed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    pub phases: PipelinePhases,
    pub throughline: String,
    pub breakthrough: String,
    pub next_step: String,
    pub key_insights: Vec<String>,
    pub conversation_arc: ConversationArc,
}

impl PipelineResult {
    /// Fixed result for transcripts without user content.
    pub fn empty() -> Self {
        Self {
            phases: PipelinePhases {
                prompting: PhaseResult::skipped(),
                reflection: PhaseResult::skipped(),
                clarification: PhaseResult::skipped(),
                synthesis: PhaseResult::skipped(),
            },
            throughline: EMPTY_THROUGHLINE.to_string(),
            breakthrough: EMPTY_BREAKTHROUGH.to_string(),
            next_step: EMPTY_NEXT_STEP.to_string(),
            key_insights: Vec::new(),
            conversation_arc: ConversationArc::empty(),
        }
    }

    /// Assembles a result from completed phases.
    ///
    /// Synthesis fields missing from generated data fall back to the
    /// synthesis placeholder text.
    pub fn from_phases(phases: PipelinePhases, conversation_arc: ConversationArc) -> Self {
        let canned = placeholder_data(AnalysisPhase::Synthesis);
        let synthesis_field = |key: &str| {
            phases
                .synthesis
                .text(key)
                .or_else(|| canned.get(key).and_then(|v| v.as_str()))
                .unwrap_or_default()
                .to_string()
        };

        let throughline = synthesis_field("throughline");
        let breakthrough = synthesis_field("breakthrough");
        let next_step = synthesis_field("nextStep");
        let key_insights = key_insights(&phases);

        Self {
            phases,
            throughline,
            breakthrough,
            next_step,
            key_insights,
            conversation_arc,
        }
    }
}

/// Short insight lines from the first three phases; blank fields contribute nothing.
pub fn key_insights(phases: &PipelinePhases) -> Vec<String> {
    let mut insights = Vec::new();
    if let Some(exploration) = phases.prompting.text("primaryExploration") {
        insights.push(format!("Primary exploration: {exploration}"));
    }
    if let Some(tension) = phases.reflection.text("coreTension") {
        insights.push(format!("Core tension: {tension}"));
    }
    let terms = phases.clarification.list("keyTerms");
    if !terms.is_empty() {
        insights.push(format!("Key terms: {}", terms.join(", ")));
    }
    insights
}
