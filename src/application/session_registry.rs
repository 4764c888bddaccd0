//! Live session registry.
//!
//! Sessions are organized by id. Each entry owns its engine, response
//! generator and variation memory, so concurrent sessions never observe
//! each other's state.
//!
//! # Thread Safety
//!
//! The map sits behind an `RwLock`; lookups (reads) vastly outnumber
//! open/close (writes). Each session has its own `Mutex`, so turns on
//! different sessions run concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::config::EngineConfig;
use crate::domain::foundation::SessionId;
use crate::domain::rcip::{
    Engine, IntentClassifier, MoveSelector, PatternCatalog, RandomSource, RcipSession,
    ResponseGenerator, SeededRandom, TemplateEngine, TemplateLibrary, ThreadRandom,
    VariationEngine, DEFAULT_MAX_TURNS,
};

/// Shared handle to one live session.
pub type SessionHandle = Arc<Mutex<RcipSession>>;

/// Produces the random source for a newly opened session.
pub type RandomFactory = Arc<dyn Fn(&SessionId) -> Box<dyn RandomSource> + Send + Sync>;

/// Errors at the session boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(SessionId),
}

impl SessionError {
    pub fn not_found(id: SessionId) -> Self {
        Self::NotFound(id)
    }
}

pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    catalog: Arc<PatternCatalog>,
    templates: Arc<TemplateLibrary>,
    max_turns: u32,
    random: RandomFactory,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TURNS)
    }
}

impl SessionRegistry {
    /// Registry using the standard catalog and thread randomness.
    pub fn new(max_turns: u32) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            catalog: PatternCatalog::standard(),
            templates: TemplateLibrary::standard(),
            max_turns,
            random: Arc::new(|_: &SessionId| Box::new(ThreadRandom) as Box<dyn RandomSource>),
        }
    }

    /// Registry configured from `EngineConfig`.
    ///
    /// A configured seed makes every session's variation choices reproducible.
    pub fn from_config(config: &EngineConfig) -> Self {
        let registry = Self::new(config.max_turns);
        match config.random_seed {
            Some(seed) => registry.with_random_factory(Arc::new(move |_: &SessionId| {
                Box::new(SeededRandom::new(seed)) as Box<dyn RandomSource>
            })),
            None => registry,
        }
    }

    pub fn with_random_factory(mut self, random: RandomFactory) -> Self {
        self.random = random;
        self
    }

    pub fn with_templates(mut self, templates: Arc<TemplateLibrary>) -> Self {
        self.templates = templates;
        self
    }

    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    fn build_session(&self, id: SessionId) -> RcipSession {
        let catalog = &self.catalog;
        let engine = Engine::new(
            IntentClassifier::new(Arc::clone(catalog)),
            MoveSelector::new(Arc::clone(catalog)),
        )
        .with_max_turns(self.max_turns);

        let responder = ResponseGenerator::new(
            Arc::clone(&self.templates),
            TemplateEngine::new(Arc::clone(catalog)),
            VariationEngine::new(Arc::clone(catalog), (self.random)(&id)),
        );

        RcipSession::new(id, engine, responder)
    }

    /// Returns the session for `id`, creating a fresh one if absent.
    pub async fn open(&self, id: SessionId) -> SessionHandle {
        let mut sessions = self.sessions.write().await;
        if let Some(existing) = sessions.get(&id) {
            return Arc::clone(existing);
        }

        let handle = Arc::new(Mutex::new(self.build_session(id)));
        sessions.insert(id, Arc::clone(&handle));
        info!(session_id = %id, open_sessions = sessions.len(), "Session opened");
        handle
    }

    pub async fn get(&self, id: &SessionId) -> Result<SessionHandle, SessionError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::not_found(*id))
    }

    /// Removes the session; in-flight holders of the handle keep it alive.
    pub async fn close(&self, id: &SessionId) -> Result<SessionHandle, SessionError> {
        let removed = self.sessions.write().await.remove(id);
        match removed {
            Some(handle) => {
                info!(session_id = %id, "Session closed");
                Ok(handle)
            }
            None => Err(SessionError::not_found(*id)),
        }
    }

    pub async fn contains(&self, id: &SessionId) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
