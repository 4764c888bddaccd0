//! AnalysisPipeline - four-phase synthesis of a closed session.
//!
//! Runs once over the full transcript, independent of the live engine:
//!
//! 1. Concatenate user message contents
//! 2. Prompting, reflection and clarification phases over that text
//! 3. Synthesis phase, seeing the first three results
//! 4. Key insights and conversation arc
//!
//! Phases run sequentially. A phase that cannot be generated degrades to its
//! placeholder inside the analyzer, so `run` always completes.

use std::sync::Arc;

use tracing::info;

use crate::adapters::analysis::{GeneratorPhaseAnalyzer, PlaceholderPhaseAnalyzer};
use crate::domain::analysis::{
    phase_prompt, synthesis_prompt, AnalysisPhase, ConversationArc, PhaseResult, PipelinePhases,
    PipelineResult, SessionMetadata,
};
use crate::domain::conversation::ConversationHistory;
use crate::ports::{PhaseAnalyzer, TextGenerator};

const USER_TEXT_SEPARATOR: &str = "\n\n";

pub struct AnalysisPipeline {
    analyzer: Arc<dyn PhaseAnalyzer>,
}

impl AnalysisPipeline {
    pub fn new(analyzer: Arc<dyn PhaseAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// Pipeline backed by a text generator.
    pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self::new(Arc::new(GeneratorPhaseAnalyzer::new(generator)))
    }

    /// Pipeline that never calls out.
    pub fn placeholder_only() -> Self {
        Self::new(Arc::new(PlaceholderPhaseAnalyzer))
    }

    /// Generator-backed when one is available, placeholder-only otherwise.
    pub fn from_optional(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        match generator {
            Some(generator) => Self::with_generator(generator),
            None => Self::placeholder_only(),
        }
    }

    pub async fn run(
        &self,
        history: &ConversationHistory,
        metadata: &SessionMetadata,
    ) -> PipelineResult {
        let user_text = user_text(history);
        let session = metadata
            .session_id
            .map(|id| id.to_string())
            .unwrap_or_default();

        if user_text.trim().is_empty() {
            info!(session_id = %session, "No user content, returning empty analysis");
            return PipelineResult::empty();
        }

        let topic = metadata.topic.as_deref();
        let prompting = self.phase(AnalysisPhase::Prompting, &user_text, topic).await;
        let reflection = self.phase(AnalysisPhase::Reflection, &user_text, topic).await;
        let clarification = self
            .phase(AnalysisPhase::Clarification, &user_text, topic)
            .await;

        let prompt = synthesis_prompt(&user_text, topic, &prompting, &reflection, &clarification);
        let synthesis = self.analyzer.analyze(&prompt, AnalysisPhase::Synthesis).await;

        let phases = PipelinePhases {
            prompting,
            reflection,
            clarification,
            synthesis,
        };
        let placeholders = phases.placeholder_count();
        let result = PipelineResult::from_phases(phases, ConversationArc::from_transcript(history));

        info!(
            session_id = %session,
            placeholders,
            user_messages = result.conversation_arc.user_message_count,
            "Session analysis complete"
        );

        result
    }

    async fn phase(
        &self,
        phase: AnalysisPhase,
        user_text: &str,
        topic: Option<&str>,
    ) -> PhaseResult {
        let prompt = phase_prompt(phase, user_text, topic);
        self.analyzer.analyze(&prompt, phase).await
    }
}

/// User message contents in transcript order.
fn user_text(history: &ConversationHistory) -> String {
    history
        .iter()
        .filter(|m| m.is_user())
        .map(|m| m.content())
        .collect::<Vec<_>>()
        .join(USER_TEXT_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockError, MockTextGenerator};
    use crate::domain::analysis::{
        placeholder_data, EvolutionPattern, PhaseSource, EMPTY_THROUGHLINE,
    };
    use crate::domain::conversation::Message;

    fn transcript() -> Vec<Message> {
        vec![
            Message::assistant("What brings you here?"),
            Message::user("I keep saying yes to every project"),
            Message::assistant("What happens when you do?"),
            Message::user("I end up exhausted and behind on everything"),
        ]
    }

    fn mock_pipeline(mock: &MockTextGenerator) -> AnalysisPipeline {
        AnalysisPipeline::with_generator(Arc::new(mock.clone()))
    }

    mod empty_sessions {
        use super::*;

        #[tokio::test]
        async fn empty_transcript_returns_fixed_result() {
            let mock = MockTextGenerator::new();
            let result = mock_pipeline(&mock).run(&[], &SessionMetadata::new()).await;

            assert_eq!(result, PipelineResult::empty());
            assert_eq!(result.throughline, EMPTY_THROUGHLINE);
            assert_eq!(mock.call_count(), 0);
        }

        #[tokio::test]
        async fn assistant_only_transcript_returns_fixed_result() {
            let mock = MockTextGenerator::new();
            let history = vec![Message::assistant("hi")];

            let result = mock_pipeline(&mock)
                .run(&history, &SessionMetadata::new())
                .await;

            assert_eq!(result, PipelineResult::empty());
            assert_eq!(mock.call_count(), 0);
        }

        #[tokio::test]
        async fn whitespace_user_content_counts_as_empty() {
            let history = vec![Message::user("   "), Message::user("\n")];

            let result = AnalysisPipeline::placeholder_only()
                .run(&history, &SessionMetadata::new())
                .await;

            assert_eq!(result, PipelineResult::empty());
        }
    }

    mod generated {
        use super::*;

        #[tokio::test]
        async fn runs_four_phases_in_order() {
            let mock = MockTextGenerator::new()
                .with_response(r#"{"primaryExploration": "saying yes", "explorationDepth": "moderate"}"#)
                .with_response(r#"{"coreTension": "helpfulness vs capacity"}"#)
                .with_response(r#"{"keyTerms": ["yes", "capacity"]}"#)
                .with_response(
                    r#"{"throughline": "Every yes costs something", "breakthrough": "Capacity is finite", "nextStep": "Decline one request this week"}"#,
                );

            let result = mock_pipeline(&mock)
                .run(&transcript(), &SessionMetadata::new())
                .await;

            assert_eq!(mock.call_count(), 4);
            assert_eq!(result.phases.placeholder_count(), 0);
            assert_eq!(result.throughline, "Every yes costs something");
            assert_eq!(result.breakthrough, "Capacity is finite");
            assert_eq!(result.next_step, "Decline one request this week");
            assert_eq!(
                result.key_insights,
                vec![
                    "Primary exploration: saying yes",
                    "Core tension: helpfulness vs capacity",
                    "Key terms: yes, capacity",
                ]
            );
        }

        #[tokio::test]
        async fn prompts_contain_only_user_text() {
            let mock = MockTextGenerator::new();

            mock_pipeline(&mock)
                .run(&transcript(), &SessionMetadata::new().with_topic("workload"))
                .await;

            let calls = mock.get_calls();
            assert_eq!(calls.len(), 4);
            for call in &calls {
                assert!(call.prompt.contains("I keep saying yes to every project"));
                assert!(call.prompt.contains("I end up exhausted"));
                assert!(!call.prompt.contains("What brings you here?"));
                assert!(call.prompt.contains("Session topic: workload"));
            }
        }

        #[tokio::test]
        async fn synthesis_prompt_sees_earlier_results() {
            let mock = MockTextGenerator::new()
                .with_response(r#"{"primaryExploration": "saying yes"}"#)
                .with_response(r#"{"coreTension": "helpfulness vs capacity"}"#)
                .with_response(r#"{"keyTerms": ["capacity"]}"#);

            mock_pipeline(&mock)
                .run(&transcript(), &SessionMetadata::new())
                .await;

            let synthesis = &mock.get_calls()[3].prompt;
            assert!(synthesis.contains("helpfulness vs capacity"));
            assert!(synthesis.contains("saying yes"));
        }

        #[tokio::test]
        async fn arc_reflects_user_messages() {
            let result = AnalysisPipeline::placeholder_only()
                .run(&transcript(), &SessionMetadata::new())
                .await;

            assert_eq!(result.conversation_arc.user_message_count, 2);
            assert_eq!(
                result.conversation_arc.evolution_pattern,
                EvolutionPattern::SingleThread
            );
        }
    }

    mod resilience {
        use super::*;

        #[tokio::test]
        async fn failing_generator_yields_complete_placeholder_result() {
            let mock = MockTextGenerator::failing(MockError::Network {
                message: "connection reset".into(),
            });

            let result = mock_pipeline(&mock)
                .run(&transcript(), &SessionMetadata::new())
                .await;

            assert_eq!(mock.call_count(), 4);
            assert_eq!(result.phases.placeholder_count(), 4);
            assert_eq!(
                result.throughline,
                placeholder_data(AnalysisPhase::Synthesis)["throughline"]
            );
            assert!(!result.next_step.is_empty());
            assert_eq!(result.key_insights.len(), 3);
        }

        #[tokio::test]
        async fn one_failed_phase_degrades_alone() {
            let mock = MockTextGenerator::new()
                .with_response(r#"{"primaryExploration": "saying yes"}"#)
                .with_error(MockError::Timeout { timeout_secs: 30 })
                .with_response(r#"{"keyTerms": ["capacity"]}"#)
                .with_response("not json at all");

            let result = mock_pipeline(&mock)
                .run(&transcript(), &SessionMetadata::new())
                .await;

            assert_eq!(result.phases.prompting.source, PhaseSource::Generated);
            assert_eq!(result.phases.reflection.source, PhaseSource::Placeholder);
            assert_eq!(result.phases.clarification.source, PhaseSource::Generated);
            assert_eq!(result.phases.synthesis.source, PhaseSource::Placeholder);
        }

        #[tokio::test]
        async fn placeholder_only_is_deterministic() {
            let pipeline = AnalysisPipeline::from_optional(None);
            let meta = SessionMetadata::new();

            let first = pipeline.run(&transcript(), &meta).await;
            let second = pipeline.run(&transcript(), &meta).await;

            assert_eq!(first, second);
            assert_eq!(first.phases.placeholder_count(), 4);
        }
    }
}
