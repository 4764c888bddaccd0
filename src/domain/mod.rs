//! Domain layer containing the conversational engine and analysis types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps)
//! - `conversation` - Transcript messages supplied by the caller
//! - `rcip` - Per-turn state machine, templates and variation
//! - `analysis` - Session-close phase data and result types

pub mod analysis;
pub mod conversation;
pub mod foundation;
pub mod rcip;
