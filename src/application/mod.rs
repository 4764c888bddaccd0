//! Application layer - Commands, Handlers, and orchestration.
//!
//! This layer owns the live session registry and the session-close analysis
//! pipeline, and exposes command handlers over both.

pub mod analysis_pipeline;
pub mod handlers;
pub mod session_registry;

pub use analysis_pipeline::AnalysisPipeline;
pub use handlers::{
    CloseSessionCommand, CloseSessionHandler, CloseSessionResult, ProcessTurnCommand,
    ProcessTurnHandler, UpdateScratchpadCommand, UpdateScratchpadHandler, UpdateScratchpadResult,
};
pub use session_registry::{RandomFactory, SessionError, SessionHandle, SessionRegistry};
