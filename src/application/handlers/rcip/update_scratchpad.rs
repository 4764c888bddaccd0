//! UpdateScratchpadHandler - Command handler for scratchpad updates.

use std::sync::Arc;

use tracing::debug;

use crate::application::session_registry::{SessionError, SessionRegistry};
use crate::domain::foundation::SessionId;
use crate::domain::rcip::{Scratchpad, ScratchpadUpdate};

/// Command to merge extracted fields into a session's scratchpad.
#[derive(Debug, Clone)]
pub struct UpdateScratchpadCommand {
    pub session_id: SessionId,
    pub update: ScratchpadUpdate,
    /// Also sets the explicit completion flag.
    pub mark_complete: bool,
}

impl UpdateScratchpadCommand {
    pub fn new(session_id: SessionId, update: ScratchpadUpdate) -> Self {
        Self {
            session_id,
            update,
            mark_complete: false,
        }
    }

    pub fn completing(mut self) -> Self {
        self.mark_complete = true;
        self
    }
}

/// Result of a successful update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateScratchpadResult {
    pub scratchpad: Scratchpad,
    pub is_done: bool,
}

/// Handler for scratchpad updates.
pub struct UpdateScratchpadHandler {
    registry: Arc<SessionRegistry>,
}

impl UpdateScratchpadHandler {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(
        &self,
        cmd: UpdateScratchpadCommand,
    ) -> Result<UpdateScratchpadResult, SessionError> {
        let session = self.registry.get(&cmd.session_id).await?;
        let mut session = session.lock().await;

        if !cmd.update.is_empty() {
            session.update_scratchpad(cmd.update);
        }
        if cmd.mark_complete {
            session.mark_complete();
        }

        let is_done = session.is_done();
        debug!(session_id = %cmd.session_id, is_done, "Scratchpad updated");

        Ok(UpdateScratchpadResult {
            scratchpad: session.engine().scratchpad().clone(),
            is_done,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn handler_with_session() -> (UpdateScratchpadHandler, SessionId) {
        let registry = Arc::new(SessionRegistry::default());
        let id = SessionId::new();
        registry.open(id).await;
        (UpdateScratchpadHandler::new(registry), id)
    }

    #[tokio::test]
    async fn throughline_and_criteria_complete_session() {
        let (handler, id) = handler_with_session().await;

        let partial = handler
            .handle(UpdateScratchpadCommand::new(
                id,
                ScratchpadUpdate::default().with_throughline("It is about trust"),
            ))
            .await
            .unwrap();
        assert!(!partial.is_done);

        let done = handler
            .handle(UpdateScratchpadCommand::new(
                id,
                ScratchpadUpdate::default().with_acceptance_criterion("trust", "I delegate one task"),
            ))
            .await
            .unwrap();

        assert!(done.is_done);
        assert_eq!(done.scratchpad.throughline(), Some("It is about trust"));
    }

    #[tokio::test]
    async fn explicit_completion() {
        let (handler, id) = handler_with_session().await;

        let result = handler
            .handle(UpdateScratchpadCommand::new(id, ScratchpadUpdate::default()).completing())
            .await
            .unwrap();

        assert!(result.is_done);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let handler = UpdateScratchpadHandler::new(Arc::new(SessionRegistry::default()));
        let id = SessionId::new();

        let err = handler
            .handle(UpdateScratchpadCommand::new(id, ScratchpadUpdate::default()))
            .await
            .unwrap_err();

        assert_eq!(err, SessionError::NotFound(id));
    }
}
