//! ProcessTurnHandler - Command handler for one user turn.

use std::sync::Arc;

use tracing::debug;

use crate::application::session_registry::{SessionError, SessionRegistry};
use crate::domain::conversation::Message;
use crate::domain::foundation::SessionId;
use crate::domain::rcip::TurnOutcome;

/// Command to process one user input.
#[derive(Debug, Clone)]
pub struct ProcessTurnCommand {
    pub session_id: SessionId,
    pub user_input: String,
    /// Transcript so far, used for variation checks.
    pub history: Vec<Message>,
}

impl ProcessTurnCommand {
    pub fn new(session_id: SessionId, user_input: impl Into<String>) -> Self {
        Self {
            session_id,
            user_input: user_input.into(),
            history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<Message>) -> Self {
        self.history = history;
        self
    }
}

/// Handler for user turns.
pub struct ProcessTurnHandler {
    registry: Arc<SessionRegistry>,
}

impl ProcessTurnHandler {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, cmd: ProcessTurnCommand) -> Result<TurnOutcome, SessionError> {
        // 1. Load session
        let session = self.registry.get(&cmd.session_id).await?;
        let mut session = session.lock().await;

        // 2. Classify and render
        let outcome = session.take_turn(&cmd.user_input, &cmd.history);

        debug!(
            session_id = %cmd.session_id,
            state = %outcome.result.state,
            move_key = %outcome.result.mv,
            turn = outcome.result.turn_count,
            "Turn processed"
        );

        Ok(outcome)
    }
}
