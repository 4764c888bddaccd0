//! Per-session bundle of engine and response generator.

use serde::Serialize;

use crate::domain::conversation::ConversationHistory;
use crate::domain::foundation::{SessionId, Timestamp};

use super::engine::{Engine, RcipResult};
use super::response::{Directive, ResponseGenerator};
use super::scratchpad::ScratchpadUpdate;

/// Result of one full turn: classification plus directive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub result: RcipResult,
    pub directive: Directive,
}

/// Everything one live conversation owns. Never shared between sessions.
#[derive(Debug)]
pub struct RcipSession {
    id: SessionId,
    engine: Engine,
    responder: ResponseGenerator,
    started_at: Timestamp,
}

impl RcipSession {
    pub fn new(id: SessionId, engine: Engine, responder: ResponseGenerator) -> Self {
        Self {
            id,
            engine,
            responder,
            started_at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn responder(&self) -> &ResponseGenerator {
        &self.responder
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    /// Processes one user input and renders the directive for it.
    pub fn take_turn(&mut self, user_input: &str, history: &ConversationHistory) -> TurnOutcome {
        let result = self.engine.process_user_input(user_input, history);
        let directive = self.responder.respond(&result, user_input, history);
        TurnOutcome { result, directive }
    }

    pub fn update_scratchpad(&mut self, update: ScratchpadUpdate) {
        self.engine.update_scratchpad(update);
    }

    pub fn mark_complete(&mut self) {
        self.engine.mark_complete();
    }

    pub fn is_done(&self) -> bool {
        self.engine.is_done()
    }

    /// Resets engine and variation memory.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.responder.reset();
    }
}
