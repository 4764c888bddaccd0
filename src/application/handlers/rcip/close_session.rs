//! CloseSessionHandler - Command handler for ending a session.
//!
//! Removes the live session from the registry, then runs the analysis
//! pipeline over the caller-supplied transcript. Analysis never fails; only
//! a missing session is an error.

use std::sync::Arc;

use tracing::info;

use crate::application::analysis_pipeline::AnalysisPipeline;
use crate::application::session_registry::{SessionError, SessionRegistry};
use crate::domain::analysis::{PipelineResult, SessionMetadata};
use crate::domain::conversation::Message;
use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::rcip::{RcipState, Scratchpad};

/// Command to close a session.
#[derive(Debug, Clone)]
pub struct CloseSessionCommand {
    pub session_id: SessionId,
    /// Full transcript to analyze.
    pub transcript: Vec<Message>,
    pub topic: Option<String>,
}

impl CloseSessionCommand {
    pub fn new(session_id: SessionId, transcript: Vec<Message>) -> Self {
        Self {
            session_id,
            transcript,
            topic: None,
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }
}

/// Final session snapshot plus its analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct CloseSessionResult {
    pub session_id: SessionId,
    pub turn_count: u32,
    pub final_state: RcipState,
    pub scratchpad: Scratchpad,
    pub analysis: PipelineResult,
}

/// Handler for closing sessions.
pub struct CloseSessionHandler {
    registry: Arc<SessionRegistry>,
    pipeline: Arc<AnalysisPipeline>,
}

impl CloseSessionHandler {
    pub fn new(registry: Arc<SessionRegistry>, pipeline: Arc<AnalysisPipeline>) -> Self {
        Self { registry, pipeline }
    }

    pub async fn handle(&self, cmd: CloseSessionCommand) -> Result<CloseSessionResult, SessionError> {
        // 1. Remove from registry
        let session = self.registry.close(&cmd.session_id).await?;

        // 2. Snapshot engine state
        let (turn_count, final_state, scratchpad, started_at) = {
            let session = session.lock().await;
            let engine = session.engine();
            (
                engine.turn_count(),
                engine.state(),
                engine.scratchpad().clone(),
                *session.started_at(),
            )
        };

        // 3. Analyze transcript
        let mut metadata = SessionMetadata::for_session(cmd.session_id);
        if let Some(topic) = cmd.topic {
            metadata = metadata.with_topic(topic);
        }
        let analysis = self.pipeline.run(&cmd.transcript, &metadata).await;

        info!(
            session_id = %cmd.session_id,
            turn_count,
            final_state = %final_state,
            duration_secs = Timestamp::now().duration_since(&started_at).num_seconds(),
            "Session analyzed"
        );

        Ok(CloseSessionResult {
            session_id: cmd.session_id,
            turn_count,
            final_state,
            scratchpad,
            analysis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockTextGenerator;
    use crate::domain::analysis::EMPTY_THROUGHLINE;

    fn handler(registry: &Arc<SessionRegistry>, pipeline: AnalysisPipeline) -> CloseSessionHandler {
        CloseSessionHandler::new(Arc::clone(registry), Arc::new(pipeline))
    }

    #[tokio::test]
    async fn closes_and_analyzes() {
        let registry = Arc::new(SessionRegistry::default());
        let id = SessionId::new();
        let session = registry.open(id).await;
        session.lock().await.take_turn("So the core thing is that I need control", &[]);

        let mock = MockTextGenerator::new().with_response(r#"{"primaryExploration": "control"}"#);
        let handler = handler(&registry, AnalysisPipeline::with_generator(Arc::new(mock.clone())));

        let result = handler
            .handle(
                CloseSessionCommand::new(
                    id,
                    vec![Message::user("So the core thing is that I need control")],
                )
                .with_topic("control"),
            )
            .await
            .unwrap();

        assert_eq!(result.turn_count, 1);
        assert_eq!(result.final_state, RcipState::Synthesis);
        assert_eq!(result.analysis.key_insights[0], "Primary exploration: control");
        assert!(mock.get_calls()[0].prompt.contains("Session topic: control"));
        assert!(!registry.contains(&id).await);
    }

    #[tokio::test]
    async fn empty_transcript_gives_empty_analysis() {
        let registry = Arc::new(SessionRegistry::default());
        let id = SessionId::new();
        registry.open(id).await;

        let result = handler(&registry, AnalysisPipeline::placeholder_only())
            .handle(CloseSessionCommand::new(id, Vec::new()))
            .await
            .unwrap();

        assert_eq!(result.turn_count, 0);
        assert_eq!(result.final_state, RcipState::Prompting);
        assert_eq!(result.analysis.throughline, EMPTY_THROUGHLINE);
    }

    #[tokio::test]
    async fn closing_twice_is_not_found() {
        let registry = Arc::new(SessionRegistry::default());
        let id = SessionId::new();
        registry.open(id).await;
        let handler = handler(&registry, AnalysisPipeline::placeholder_only());

        handler.handle(CloseSessionCommand::new(id, Vec::new())).await.unwrap();
        let err = handler
            .handle(CloseSessionCommand::new(id, Vec::new()))
            .await
            .unwrap_err();

        assert_eq!(err, SessionError::NotFound(id));
    }
}
