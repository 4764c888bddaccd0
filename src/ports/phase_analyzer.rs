//! PhaseAnalyzer port - strategy for producing one analysis phase.
//!
//! Implementations never fail: a network-backed analyzer degrades to the
//! phase placeholder on any error, and the placeholder analyzer never calls
//! out at all. Which one runs is decided when the pipeline is built.

use async_trait::async_trait;

use crate::domain::analysis::{AnalysisPhase, PhaseResult};

/// Produces structured data for one phase from a prompt.
#[async_trait]
pub trait PhaseAnalyzer: Send + Sync {
    async fn analyze(&self, prompt: &str, phase: AnalysisPhase) -> PhaseResult;
}
