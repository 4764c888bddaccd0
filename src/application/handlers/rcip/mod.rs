//! RCIP session handlers.
//!
//! - `ProcessTurnHandler` - classify one user turn and render its directive
//! - `UpdateScratchpadHandler` - apply caller-extracted scratchpad fields
//! - `CloseSessionHandler` - remove a session and analyze its transcript

mod close_session;
mod process_turn;
mod update_scratchpad;

pub use close_session::{CloseSessionCommand, CloseSessionHandler, CloseSessionResult};
pub use process_turn::{ProcessTurnCommand, ProcessTurnHandler};
pub use update_scratchpad::{
    UpdateScratchpadCommand, UpdateScratchpadHandler, UpdateScratchpadResult,
};
