//! Application handlers.
//!
//! Command handlers that orchestrate live sessions and session-close analysis.

pub mod rcip;

pub use rcip::{
    CloseSessionCommand, CloseSessionHandler, CloseSessionResult, ProcessTurnCommand,
    ProcessTurnHandler, UpdateScratchpadCommand, UpdateScratchpadHandler, UpdateScratchpadResult,
};
