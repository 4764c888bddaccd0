//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `TextGenerator` - The optional external text-generation client
//! - `PhaseAnalyzer` - Strategy producing one analysis phase result

mod phase_analyzer;
mod text_generator;

pub use phase_analyzer::PhaseAnalyzer;
pub use text_generator::{GenerationError, GenerationOptions, GeneratorInfo, TextGenerator};
