//! Conversation domain module.
//!
//! Transcript types shared by the live engine and the closing analysis.

mod message;

pub use message::{ConversationHistory, Message, Role};
