//! Analyzer used when no text generator is configured.

use async_trait::async_trait;

use crate::domain::analysis::{placeholder_result, AnalysisPhase, PhaseResult};
use crate::ports::PhaseAnalyzer;

/// Returns the canned placeholder for every phase without looking at the prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderPhaseAnalyzer;

#[async_trait]
impl PhaseAnalyzer for PlaceholderPhaseAnalyzer {
    async fn analyze(&self, _prompt: &str, phase: AnalysisPhase) -> PhaseResult {
        placeholder_result(phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_phase_is_placeholder() {
        for phase in AnalysisPhase::ALL {
            let result = PlaceholderPhaseAnalyzer.analyze("anything", phase).await;
            assert!(result.is_placeholder());
            assert_eq!(result, placeholder_result(phase));
        }
    }
}
