//! RCIP Engine - Conversational flow engine
//!
//! Classifies each user turn into a dialogue state (Prompting, Reflection,
//! Clarification, Synthesis) and a sub-move, renders a guided response
//! directive through a variation layer, and at session close runs a
//! four-phase analysis over the transcript.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
