//! Slot filling for response templates.
//!
//! Each `{{slot}}` is resolved by a strategy chosen from the slot's name.
//! Every strategy ends in a fallback, so filling never fails.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::patterns::{normalized_words, significant_words, PatternCatalog, ROLE_VOCABULARY};
use super::scratchpad::Scratchpad;
use super::templates::TemplateDefinition;

static SLOT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("slot pattern must compile")
});

const DEFAULT_CHOICE_A: &str = "this";
const DEFAULT_CHOICE_B: &str = "that";
const DEFAULT_CONCEPT: &str = "this situation";
const DEFAULT_TERM: &str = "this";
const DEFAULT_ROLE: &str = "someone in your position";
const DEFAULT_TENSION: &str = "two things that both feel true";
const DEFAULT_PATTERN: &str = "this recurring theme";

/// Words taken after an obligation keyword.
const CONSTRAINT_WORDS: usize = 5;

/// A rendered template and the values chosen for each slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilledTemplate {
    pub text: String,
    pub filled_slots: BTreeMap<String, String>,
}

/// Extraction strategy, keyed by slot name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotKind {
    ChoiceA,
    ChoiceB,
    Concept,
    Term,
    Role,
    Thread(usize),
    Tension,
    Pattern,
    Constraint,
    Other,
}

impl SlotKind {
    fn of(name: &str) -> Self {
        match name {
            "A" => return Self::ChoiceA,
            "B" => return Self::ChoiceB,
            _ => {}
        }
        let lower = name.to_lowercase();
        if lower.contains("concept") || lower.contains("truth") {
            Self::Concept
        } else if lower.contains("term") {
            Self::Term
        } else if lower.contains("role") {
            Self::Role
        } else if lower.contains("thread") {
            let index = lower
                .chars()
                .last()
                .and_then(|c| c.to_digit(10))
                .map(|d| d as usize)
                .unwrap_or(1);
            Self::Thread(index)
        } else if lower.contains("tension") {
            Self::Tension
        } else if lower.contains("pattern") {
            Self::Pattern
        } else if lower.contains("constraint") || lower.contains("requirement") {
            Self::Constraint
        } else {
            Self::Other
        }
    }
}

/// Fills template slots from the user's input and the scratchpad.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    catalog: Arc<PatternCatalog>,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(PatternCatalog::standard())
    }
}

impl TemplateEngine {
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        Self { catalog }
    }

    /// Renders `definition`, resolving every placeholder.
    pub fn fill_template(
        &self,
        definition: &TemplateDefinition,
        scratchpad: &Scratchpad,
        user_input: &str,
    ) -> FilledTemplate {
        let mut filled_slots = BTreeMap::new();
        let text = SLOT
            .replace_all(definition.template, |caps: &Captures| {
                let name = &caps[1];
                filled_slots
                    .entry(name.to_string())
                    .or_insert_with(|| self.resolve(name, scratchpad, user_input))
                    .clone()
            })
            .into_owned();

        FilledTemplate { text, filled_slots }
    }

    fn resolve(&self, name: &str, scratchpad: &Scratchpad, input: &str) -> String {
        let extracted = match SlotKind::of(name) {
            SlotKind::ChoiceA => Some(self.binary_choice(input).map_or_else(
                || DEFAULT_CHOICE_A.to_string(),
                |(a, _)| a,
            )),
            SlotKind::ChoiceB => Some(self.binary_choice(input).map_or_else(
                || DEFAULT_CHOICE_B.to_string(),
                |(_, b)| b,
            )),
            SlotKind::Concept => Some(concept(scratchpad, input)),
            SlotKind::Term => Some(self.term(input)),
            SlotKind::Role => Some(role(input)),
            SlotKind::Thread(index) => index
                .checked_sub(1)
                .and_then(|i| scratchpad.entities().get(i))
                .cloned(),
            SlotKind::Tension => Some(self.tension(scratchpad, input)),
            SlotKind::Pattern => Some(self.pattern(input)),
            SlotKind::Constraint => self.constraint(input),
            SlotKind::Other => None,
        };

        extracted.unwrap_or_else(|| {
            scratchpad
                .entities()
                .first()
                .cloned()
                .unwrap_or_else(|| name.to_string())
        })
    }

    /// First binary-choice shape found in `input` (`X vs Y`, `either X or Y`, `X and Y`).
    fn binary_choice(&self, input: &str) -> Option<(String, String)> {
        self.catalog.binary_choices().iter().find_map(|re| {
            let caps = re.captures(input)?;
            let a = clean(caps.get(1)?.as_str());
            let b = clean(caps.get(2)?.as_str());
            (!a.is_empty() && !b.is_empty()).then_some((a, b))
        })
    }

    fn term(&self, input: &str) -> String {
        self.catalog
            .emphasis()
            .captures(input)
            .and_then(|caps| (1..=4).find_map(|i| caps.get(i)))
            .map(|m| clean(m.as_str()))
            .filter(|term| !term.is_empty())
            .unwrap_or_else(|| DEFAULT_TERM.to_string())
    }

    fn tension(&self, scratchpad: &Scratchpad, input: &str) -> String {
        if let Some(m) = self.catalog.contrast().find(input) {
            let left = clean(&input[..m.start()]);
            let right = clean(&input[m.end()..]);
            if !left.is_empty() && !right.is_empty() {
                return format!("{left} vs {right}");
            }
        }
        scratchpad
            .truths_in_tension()
            .first()
            .cloned()
            .unwrap_or_else(|| DEFAULT_TENSION.to_string())
    }

    fn pattern(&self, input: &str) -> String {
        self.catalog
            .frequency()
            .captures(input)
            .and_then(|caps| caps.get(1))
            .map(|adverb| format!("the way you {}", adverb.as_str().to_lowercase()))
            .unwrap_or_else(|| DEFAULT_PATTERN.to_string())
    }

    fn constraint(&self, input: &str) -> Option<String> {
        let m = self.catalog.obligation().find(input)?;
        let phrase = normalized_words(&input[m.end()..])
            .take(CONSTRAINT_WORDS)
            .collect::<Vec<_>>()
            .join(" ");
        (!phrase.is_empty()).then_some(phrase)
    }
}

fn concept(scratchpad: &Scratchpad, input: &str) -> String {
    if let Some(entity) = scratchpad.entities().first() {
        return entity.clone();
    }
    significant_words(input)
        .find(|w| w.chars().all(char::is_alphabetic))
        .unwrap_or_else(|| DEFAULT_CONCEPT.to_string())
}

fn role(input: &str) -> String {
    normalized_words(input)
        .find(|w| ROLE_VOCABULARY.contains(&w.as_str()))
        .unwrap_or_else(|| DEFAULT_ROLE.to_string())
}

/// Trims whitespace and trailing punctuation from an extracted phrase.
fn clean(raw: &str) -> String {
    raw.trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim()
        .to_string()
}
