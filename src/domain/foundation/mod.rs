//! Foundation module - Shared domain primitives.
//!
//! Identifiers and time values used across the RCIP domain.

mod ids;
mod timestamp;

pub use ids::{MessageId, SessionId};
pub use timestamp::Timestamp;
