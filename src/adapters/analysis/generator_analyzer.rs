//! PhaseAnalyzer backed by a text generator.
//!
//! Each phase is one `generate` call whose reply is parsed as a JSON object.
//! Any failure (generation error, missing or malformed JSON) degrades that
//! single phase to its placeholder and is logged; it never reaches the caller.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::analysis::{
    placeholder_result, AnalysisPhase, JsonExtractor, PhaseResult, ANALYSIS_SYSTEM_PROMPT,
};
use crate::ports::{GenerationOptions, PhaseAnalyzer, TextGenerator};

const DEFAULT_MAX_TOKENS: u32 = 1024;
const DEFAULT_TEMPERATURE: f32 = 0.3;

pub struct GeneratorPhaseAnalyzer {
    generator: Arc<dyn TextGenerator>,
    extractor: JsonExtractor,
    options: GenerationOptions,
}

impl GeneratorPhaseAnalyzer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            extractor: JsonExtractor::new(),
            options: GenerationOptions::new()
                .with_system_prompt(ANALYSIS_SYSTEM_PROMPT)
                .with_max_tokens(DEFAULT_MAX_TOKENS)
                .with_temperature(DEFAULT_TEMPERATURE),
        }
    }

    /// Replaces the per-call generation options.
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }
}

#[async_trait]
impl PhaseAnalyzer for GeneratorPhaseAnalyzer {
    async fn analyze(&self, prompt: &str, phase: AnalysisPhase) -> PhaseResult {
        let info = self.generator.generator_info();

        let reply = match self.generator.generate(prompt, &self.options).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(
                    phase = %phase,
                    generator = %info.name,
                    error = %err,
                    "Phase generation failed, using placeholder"
                );
                return placeholder_result(phase);
            }
        };

        match self.extractor.extract_object(&reply) {
            Ok(data) => {
                debug!(phase = %phase, keys = data.len(), "Phase analysis generated");
                PhaseResult::generated(data)
            }
            Err(err) => {
                warn!(
                    phase = %phase,
                    generator = %info.name,
                    error = %err,
                    "Phase reply was not a JSON object, using placeholder"
                );
                placeholder_result(phase)
            }
        }
    }
}
