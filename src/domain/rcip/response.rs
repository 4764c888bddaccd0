//! Turns an engine result into a displayable directive.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::conversation::ConversationHistory;

use super::engine::RcipResult;
use super::moves::Move;
use super::scratchpad::Scratchpad;
use super::state::RcipState;
use super::template_engine::TemplateEngine;
use super::templates::{fallback_for, TemplateLibrary};
use super::variation::{AppliedVariation, VariationEngine};

/// Provenance of a directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectiveMetadata {
    pub state: RcipState,
    #[serde(rename = "move")]
    pub mv: Move,
    /// `STATE.MOVE` key of the template, or `fallback:STATE`.
    pub template_used: String,
    pub variations_applied: Vec<AppliedVariation>,
    pub filled_slots: BTreeMap<String, String>,
}

impl DirectiveMetadata {
    /// Names of the variations that fired, in application order.
    pub fn variation_names(&self) -> Vec<&'static str> {
        self.variations_applied
            .iter()
            .map(AppliedVariation::name)
            .collect()
    }

    pub fn is_fallback(&self) -> bool {
        self.template_used.starts_with("fallback:")
    }
}

/// What the caller hands to the downstream text generator for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    pub response: String,
    pub guardrail: String,
    pub post_hooks: Vec<String>,
    pub metadata: DirectiveMetadata,
}

/// Template lookup, slot filling and variation for one session.
#[derive(Debug)]
pub struct ResponseGenerator {
    templates: Arc<TemplateLibrary>,
    template_engine: TemplateEngine,
    variation: VariationEngine,
}

impl Default for ResponseGenerator {
    fn default() -> Self {
        Self::new(
            TemplateLibrary::standard(),
            TemplateEngine::default(),
            VariationEngine::default(),
        )
    }
}

impl ResponseGenerator {
    pub fn new(
        templates: Arc<TemplateLibrary>,
        template_engine: TemplateEngine,
        variation: VariationEngine,
    ) -> Self {
        Self {
            templates,
            template_engine,
            variation,
        }
    }

    pub fn variation(&self) -> &VariationEngine {
        &self.variation
    }

    pub fn reset(&mut self) {
        self.variation.reset();
    }

    /// Builds the directive for `state`/`mv`.
    ///
    /// A move that does not belong to `state`, or has no template, yields the
    /// state's fallback directive.
    pub fn generate_response(
        &mut self,
        state: RcipState,
        mv: Move,
        scratchpad: &Scratchpad,
        user_input: &str,
        history: &ConversationHistory,
    ) -> Directive {
        let definition = if mv.state() == state {
            self.templates.get(mv).copied()
        } else {
            None
        };

        let Some(definition) = definition else {
            tracing::warn!(state = %state, move_key = %mv, "No template for move, using fallback");
            let fallback = fallback_for(state);
            return Directive {
                response: fallback.response.to_string(),
                guardrail: fallback.guardrail.to_string(),
                post_hooks: Vec::new(),
                metadata: DirectiveMetadata {
                    state,
                    mv,
                    template_used: format!("fallback:{state}"),
                    variations_applied: Vec::new(),
                    filled_slots: BTreeMap::new(),
                },
            };
        };

        let filled = self
            .template_engine
            .fill_template(&definition, scratchpad, user_input);
        let varied = self.variation.apply(
            filled.text,
            definition.guardrail.to_string(),
            user_input,
            history,
        );

        Directive {
            response: varied.text,
            guardrail: varied.guardrail,
            post_hooks: definition.post_hooks.iter().map(|h| h.to_string()).collect(),
            metadata: DirectiveMetadata {
                state,
                mv,
                template_used: mv.key(),
                variations_applied: varied.applied,
                filled_slots: filled.filled_slots,
            },
        }
    }

    /// Convenience wrapper taking the engine's result directly.
    pub fn respond(
        &mut self,
        result: &RcipResult,
        user_input: &str,
        history: &ConversationHistory,
    ) -> Directive {
        self.generate_response(result.state, result.mv, &result.scratchpad, user_input, history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rcip::moves::{ReflectionMove, SynthesisMove};
    use crate::domain::rcip::patterns::PatternCatalog;
    use crate::domain::rcip::random::FixedRandom;
    use std::collections::HashMap;

    fn generator() -> ResponseGenerator {
        ResponseGenerator::new(
            TemplateLibrary::standard(),
            TemplateEngine::default(),
            VariationEngine::new(PatternCatalog::standard(), Box::new(FixedRandom(0))),
        )
    }

    const COLD_CORE: Move = Move::Synthesis(SynthesisMove::ColdCore);

    #[test]
    fn renders_template_with_slots() {
        let mut generator = generator();
        let mut pad = Scratchpad::new();
        pad.update_entities("trust");

        let directive =
            generator.generate_response(RcipState::Synthesis, COLD_CORE, &pad, "trust", &[]);

        assert!(directive.response.contains("cold core seems to be trust"));
        assert_eq!(directive.metadata.template_used, "SYNTHESIS.COLD_CORE");
        assert_eq!(directive.metadata.filled_slots["truth"], "trust");
        assert_eq!(directive.post_hooks, vec!["capture_throughline"]);
        assert!(!directive.guardrail.is_empty());
    }

    #[test]
    fn third_identical_cold_core_is_pattern_broken() {
        let mut generator = generator();
        let pad = Scratchpad::new();
        let render = |g: &mut ResponseGenerator| {
            g.generate_response(RcipState::Synthesis, COLD_CORE, &pad, "hmm", &[])
        };

        let first = render(&mut generator);
        let second = render(&mut generator);
        let third = render(&mut generator);

        assert_eq!(first.response, second.response);
        assert!(!first.metadata.variation_names().contains(&"pattern_breaker"));
        assert!(third.metadata.variation_names().contains(&"pattern_breaker"));
        assert_ne!(third.response, first.response);
    }

    #[test]
    fn mismatched_state_uses_fallback() {
        let mut generator = generator();
        let directive = generator.generate_response(
            RcipState::Prompting,
            Move::Reflection(ReflectionMove::ThreadWeave),
            &Scratchpad::new(),
            "",
            &[],
        );
        assert!(directive.metadata.is_fallback());
        assert_eq!(directive.response, fallback_for(RcipState::Prompting).response);
    }

    #[test]
    fn missing_template_uses_fallback() {
        let mut generator = ResponseGenerator::new(
            Arc::new(TemplateLibrary::custom(HashMap::new())),
            TemplateEngine::default(),
            VariationEngine::default(),
        );
        let directive = generator.generate_response(
            RcipState::Synthesis,
            COLD_CORE,
            &Scratchpad::new(),
            "",
            &[],
        );
        assert_eq!(directive.metadata.template_used, "fallback:SYNTHESIS");
        assert!(directive.metadata.variations_applied.is_empty());
        assert!(directive.post_hooks.is_empty());
    }

    #[test]
    fn responds_to_engine_result() {
        use crate::domain::rcip::engine::Engine;

        let mut engine = Engine::default();
        let mut generator = generator();
        let input = "I'm not sure what we mean by scope";
        let result = engine.process_user_input(input, &[]);
        let directive = generator.respond(&result, input, &[]);

        assert_eq!(directive.metadata.template_used, "CLARIFICATION.SINGLE_NEEDLE");
        assert!(directive.response.contains("when you say this"));
    }
}
