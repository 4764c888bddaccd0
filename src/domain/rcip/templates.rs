//! Template library keyed by `STATE.MOVE`.
//!
//! Every template contains one of the structural shapes the variation
//! engine fingerprints, so repetition across turns is detectable.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::moves::{
    ClarificationMove, Move, PromptingMove, ReflectionMove, SynthesisMove,
};
use super::state::RcipState;

/// A parametrized response template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateDefinition {
    /// Text with `{{slot}}` placeholders.
    pub template: &'static str,
    /// How the downstream generator should adapt the template.
    pub guardrail: &'static str,
    pub slot_hints: &'static [&'static str],
    /// Follow-up actions for the caller after the turn is rendered.
    pub post_hooks: &'static [&'static str],
}

/// Directive used when a `STATE.MOVE` key has no template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackDirective {
    pub response: &'static str,
    pub guardrail: &'static str,
}

const FALLBACK_GUARDRAIL: &str = "Keep it to one short question. Do not summarize.";

/// Fallback directive for a state.
pub fn fallback_for(state: RcipState) -> FallbackDirective {
    let response = match state {
        RcipState::Prompting => "What feels most important to explore right now?",
        RcipState::Reflection => "What do you notice when you look back at what you've said?",
        RcipState::Clarification => "Which part of this feels least clear to you?",
        RcipState::Synthesis => "If you had to put all of this in one sentence, what would it be?",
    };
    FallbackDirective {
        response,
        guardrail: FALLBACK_GUARDRAIL,
    }
}

fn def(
    template: &'static str,
    guardrail: &'static str,
    slot_hints: &'static [&'static str],
    post_hooks: &'static [&'static str],
) -> TemplateDefinition {
    TemplateDefinition {
        template,
        guardrail,
        slot_hints,
        post_hooks,
    }
}

static STANDARD: Lazy<Arc<TemplateLibrary>> = Lazy::new(|| {
    use ClarificationMove as C;
    use PromptingMove as P;
    use ReflectionMove as R;
    use SynthesisMove as S;

    let entries = [
        // Prompting
        (
            Move::Prompting(P::OpenDoor),
            def(
                "What if we started with {{concept}}? Tell me what feels most alive about it right now.",
                "Stay open. Do not suggest answers or structure yet.",
                &["concept: the subject the user raised"],
                &["capture_goal"],
            ),
        ),
        (
            Move::Prompting(P::GoalProbe),
            def(
                "You mentioned {{concept}}. If this went exactly right, what would be different a month from now?",
                "Ask about outcomes, not plans. One question only.",
                &["concept: the thing the user wants"],
                &["capture_goal"],
            ),
        ),
        (
            Move::Prompting(P::ConstraintProbe),
            def(
                "Let's name the hard edge first: {{constraint}}. What happens if that line moves?",
                "Treat the constraint as testable, not fixed. Avoid problem solving.",
                &["constraint: the obligation the user stated"],
                &["capture_assumption"],
            ),
        ),
        (
            Move::Prompting(P::RoleLens),
            def(
                "Most people in the role of {{role}} would reach for the obvious fix. What would you do differently with {{concept}}?",
                "Use the role to open options, never to judge the user.",
                &["role: the user's role", "concept: the subject at hand"],
                &[],
            ),
        ),
        (
            Move::Prompting(P::StuckPoint),
            def(
                "The real question might be where exactly {{concept}} stalls. What is the last step that felt easy?",
                "Locate the friction precisely. Do not reassure.",
                &["concept: what the user is stuck on"],
                &["capture_open_question"],
            ),
        ),
        // Reflection
        (
            Move::Reflection(R::MirrorPattern),
            def(
                "You've mentioned {{pattern}} more than once. What does that pattern protect you from?",
                "Name the pattern gently. No diagnosis.",
                &["pattern: a recurring behavior in the user's words"],
                &["capture_theme"],
            ),
        ),
        (
            Move::Reflection(R::TensionName),
            def(
                "Let's name it plainly: {{tension}}. Which side are you quietly favoring?",
                "Hold both sides as true. Do not resolve the tension for the user.",
                &["tension: two sides separated by a contrast"],
                &["capture_tension"],
            ),
        ),
        (
            Move::Reflection(R::AssumptionSurface),
            def(
                "Underneath {{concept}} there seems to be an assumption. What would change if it turned out to be false?",
                "Offer the assumption as a hypothesis, not a fact.",
                &["concept: the belief carrying the weight"],
                &["capture_assumption"],
            ),
        ),
        (
            Move::Reflection(R::ThreadWeave),
            def(
                "What if {{thread1}} and {{thread2}} are the same story told twice?",
                "Connect threads using the user's own words.",
                &["thread1: an earlier topic", "thread2: a later topic"],
                &["capture_theme"],
            ),
        ),
        // Clarification
        (
            Move::Clarification(C::SingleNeedle),
            def(
                "The core question is this: when you say {{term}}, what exactly do you mean?",
                "Ask exactly one question. Do not offer definitions.",
                &["term: the vaguest word in the input"],
                &["capture_definition"],
            ),
        ),
        (
            Move::Clarification(C::BinaryFork),
            def(
                "{{A}} vs {{B}}: if you could only keep one, which matters more?",
                "Force the choice. Accept 'neither' only with a reason.",
                &["A: first option", "B: second option"],
                &["capture_tension"],
            ),
        ),
        (
            Move::Clarification(C::TrackCheck),
            def(
                "What if we're on the wrong track? Is {{concept}} still the thing you most want to untangle?",
                "Check direction without implying the user erred.",
                &["concept: the current focus"],
                &[],
            ),
        ),
        (
            Move::Clarification(C::CriteriaCheck),
            def(
                "Most people judge this by gut feel. How will you know {{concept}} turned out well?",
                "Push for observable criteria.",
                &["concept: the outcome being judged"],
                &["capture_acceptance_criteria"],
            ),
        ),
        (
            Move::Clarification(C::ThreadPick),
            def(
                "You've said a lot about {{thread1}} and {{thread2}}. Which single thread should we pull first?",
                "Narrow to one thread. Park the rest explicitly.",
                &["thread1: a prominent topic", "thread2: another prominent topic"],
                &["capture_open_question"],
            ),
        ),
        // Synthesis
        (
            Move::Synthesis(S::ColdCore),
            def(
                "Underneath everything, the cold core seems to be {{truth}}. Does that land, or is it something harder?",
                "State it plainly. Invite correction.",
                &["truth: the central subject"],
                &["capture_throughline"],
            ),
        ),
        (
            Move::Synthesis(S::ThroughlineDraft),
            def(
                "Let's name a first draft of the throughline: {{concept}} keeps connecting the pieces so far. What would you change in that sentence?",
                "Offer the draft as editable. One sentence only.",
                &["concept: the recurring subject"],
                &["capture_throughline"],
            ),
        ),
        (
            Move::Synthesis(S::NextStep),
            def(
                "What if the next step were small enough to start tomorrow? Given {{constraint}}, what is the first move?",
                "Keep the step concrete and small.",
                &["constraint: the limit the step must respect"],
                &["capture_next_step"],
            ),
        ),
        (
            Move::Synthesis(S::AcceptanceTest),
            def(
                "The real question for {{concept}}: what would have to be true for you to call this done?",
                "Ask for a testable condition.",
                &["concept: the outcome being defined"],
                &["capture_acceptance_criteria"],
            ),
        ),
        (
            Move::Synthesis(S::TensionResolve),
            def(
                "{{tension}}. Which matters more once you stop trying to satisfy both?",
                "Let the user resolve it. Do not pick a side.",
                &["tension: the unresolved pair"],
                &["capture_tension"],
            ),
        ),
        (
            Move::Synthesis(S::BreakthroughFrame),
            def(
                "Most people miss the moment it clicks. Say back, in one sentence, what {{concept}} means to you now.",
                "Reflect the shift without praising it.",
                &["concept: what just clicked"],
                &["capture_throughline", "mark_breakthrough"],
            ),
        ),
    ];

    Arc::new(TemplateLibrary::custom(entries.into_iter().collect()))
});

/// Lookup table from move to template.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    templates: HashMap<Move, TemplateDefinition>,
}

impl TemplateLibrary {
    /// Shared library with a template for every move.
    pub fn standard() -> Arc<TemplateLibrary> {
        Arc::clone(&STANDARD)
    }

    pub fn custom(templates: HashMap<Move, TemplateDefinition>) -> Self {
        Self { templates }
    }

    pub fn get(&self, mv: Move) -> Option<&TemplateDefinition> {
        self.templates.get(&mv)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
