//! PhaseAnalyzer implementations.

mod generator_analyzer;
mod placeholder_analyzer;

pub use generator_analyzer::GeneratorPhaseAnalyzer;
pub use placeholder_analyzer::PlaceholderPhaseAnalyzer;
