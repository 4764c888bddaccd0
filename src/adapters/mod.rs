//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Text generators (Anthropic, mock)
//! - `analysis` - Phase analyzers (generator-backed, placeholder)

pub mod ai;
pub mod analysis;

pub use ai::{AnthropicConfig, AnthropicTextGenerator, MockTextGenerator};
pub use analysis::{GeneratorPhaseAnalyzer, PlaceholderPhaseAnalyzer};
