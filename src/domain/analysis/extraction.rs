//! Structured-data extraction from generator output.
//!
//! Generator replies often wrap JSON in prose or markdown fences. The
//! extractor sanitizes the reply, locates the JSON object, parses it and
//! cleans every string field.

use serde_json::{Map, Value};
use thiserror::Error;

/// Maximum accepted reply length (100KB).
pub const MAX_RESPONSE_LENGTH: usize = 100_000;

/// Maximum length of one string field after extraction (10KB).
pub const MAX_FIELD_LENGTH: usize = 10_000;

const INJECTION_MARKERS: [&str; 11] = [
    "```system",
    "```assistant",
    "[INST]",
    "[/INST]",
    "<|system|>",
    "<|assistant|>",
    "<|user|>",
    "<|im_start|>",
    "<|im_end|>",
    "<<SYS>>",
    "<</SYS>>",
];

/// Errors that can occur while extracting phase data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Response too long: {actual} bytes exceeds maximum of {max} bytes")]
    TooLong { max: usize, actual: usize },

    #[error("JSON parse error: {0}")]
    Parse(String),

    #[error("Expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Extracts a JSON object from free-form generator output.
#[derive(Debug, Clone, Default)]
pub struct JsonExtractor;

impl JsonExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Sanitizes `response` and returns the JSON object it contains.
    pub fn extract_object(&self, response: &str) -> Result<Map<String, Value>, ExtractionError> {
        if response.len() > MAX_RESPONSE_LENGTH {
            return Err(ExtractionError::TooLong {
                max: MAX_RESPONSE_LENGTH,
                actual: response.len(),
            });
        }

        let cleaned = strip_injection_markers(&remove_control_chars(response));
        let value = locate_json(&cleaned)?;

        match sanitize_strings(value) {
            Value::Object(map) => Ok(map),
            other => Err(ExtractionError::NotAnObject(kind(&other))),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn remove_control_chars(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
        .collect()
}

fn strip_injection_markers(s: &str) -> String {
    INJECTION_MARKERS
        .iter()
        .fold(s.to_string(), |acc, marker| acc.replace(marker, ""))
}

/// Fenced block first, then the first balanced object that parses, else the whole text.
fn locate_json(response: &str) -> Result<Value, ExtractionError> {
    let trimmed = response.trim();

    if let Some(json) = from_code_block(trimmed) {
        return parse(&json);
    }

    let object = trimmed
        .match_indices('{')
        .filter_map(|(at, _)| balanced(trimmed, at, '{', '}'))
        .find_map(|candidate| serde_json::from_str::<Value>(&candidate).ok());

    match object {
        Some(value) => Ok(value),
        None => parse(trimmed),
    }
}

fn parse(json: &str) -> Result<Value, ExtractionError> {
    serde_json::from_str(json).map_err(|e| ExtractionError::Parse(e.to_string()))
}

fn from_code_block(s: &str) -> Option<String> {
    const FENCES: [&str; 4] = ["```json\n", "```json\r\n", "```\n", "```\r\n"];
    FENCES.iter().find_map(|fence| {
        let start = s.find(fence)? + fence.len();
        let end = s[start..].find("```")?;
        Some(s[start..start + end].trim().to_string())
    })
}

fn balanced(s: &str, start: usize, open: char, close: char) -> Option<String> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            c if c == open => depth += 1,
            c if c == close => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let end = start + offset + c.len_utf8();
                    return Some(s[start..end].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

fn sanitize_strings(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_field(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_strings).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, sanitize_strings(v)))
                .collect(),
        ),
        other => other,
    }
}

fn sanitize_field(s: &str) -> String {
    let mut text = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    if text.len() > MAX_FIELD_LENGTH {
        let mut cut = MAX_FIELD_LENGTH;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...[truncated]", &text[..cut])
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extract(response: &str) -> Result<Map<String, Value>, ExtractionError> {
        JsonExtractor::new().extract_object(response)
    }

    mod locating {
        use super::*;

        #[test]
        fn plain_object() {
            let map = extract(r#"{"throughline": "trust"}"#).unwrap();
            assert_eq!(map["throughline"], "trust");
        }

        #[test]
        fn fenced_json_block() {
            let response = "Here you go:\n```json\n{\"nextStep\": \"call Sam\"}\n```\nThanks";
            assert_eq!(extract(response).unwrap()["nextStep"], "call Sam");
        }

        #[test]
        fn unlabelled_fence() {
            let response = "```\n{\"a\": 1}\n```";
            assert_eq!(extract(response).unwrap()["a"], 1);
        }

        #[test]
        fn object_after_preamble_with_trailing_prose() {
            let response = r#"Sure! {"coreTension": "a {b} c", "x": [1, 2]} Hope that helps."#;
            let map = extract(response).unwrap();
            assert_eq!(map["coreTension"], "a {b} c");
            assert_eq!(map["x"], json!([1, 2]));
        }

        #[test]
        fn bracketed_preamble_is_skipped() {
            let response = "Phase [1/4] analysis:\n{\"primaryExploration\": \"saying yes\"}";
            let map = extract(response).unwrap();
            assert_eq!(map["primaryExploration"], "saying yes");
        }

        #[test]
        fn unparseable_braces_before_object_are_skipped() {
            let response = r#"Using {placeholders} here: {"keyTerms": ["scope"]}"#;
            assert_eq!(extract(response).unwrap()["keyTerms"], json!(["scope"]));
        }

        #[test]
        fn multibyte_text_before_closing_brace() {
            let map = extract(r#"Voilà: {"keyTerms": ["café", "naïve"]} fin"#).unwrap();
            assert_eq!(map["keyTerms"], json!(["café", "naïve"]));
        }
    }

    mod failures {
        use super::*;

        #[test]
        fn prose_is_a_parse_error() {
            assert!(matches!(extract("I could not do that."), Err(ExtractionError::Parse(_))));
        }

        #[test]
        fn array_is_not_an_object() {
            assert_eq!(extract("[1, 2]"), Err(ExtractionError::NotAnObject("array")));
        }

        #[test]
        fn string_is_not_an_object() {
            assert_eq!(extract("\"hello\""), Err(ExtractionError::NotAnObject("string")));
        }

        #[test]
        fn oversized_response_is_rejected() {
            let huge = "x".repeat(MAX_RESPONSE_LENGTH + 1);
            assert!(matches!(extract(&huge), Err(ExtractionError::TooLong { .. })));
        }
    }

    mod sanitizing {
        use super::*;

        #[test]
        fn strips_html_from_strings() {
            let map = extract(r#"{"a": "<b>bold</b> move"}"#).unwrap();
            assert_eq!(map["a"], "bold move");
        }

        #[test]
        fn strips_injection_markers() {
            let map = extract(r#"<|im_start|>{"a": "[INST]ok"}"#).unwrap();
            assert_eq!(map["a"], "ok");
        }

        #[test]
        fn truncates_long_fields() {
            let long = "y".repeat(MAX_FIELD_LENGTH + 10);
            let map = extract(&format!(r#"{{"a": "{long}"}}"#)).unwrap();
            let value = map["a"].as_str().unwrap();
            assert!(value.ends_with("...[truncated]"));
            assert_eq!(value.len(), MAX_FIELD_LENGTH + "...[truncated]".len());
        }

        #[test]
        fn keeps_numbers_and_booleans() {
            let map = extract(r#"{"n": 3, "b": true, "z": null}"#).unwrap();
            assert_eq!(map["n"], 3);
            assert_eq!(map["b"], true);
            assert!(map["z"].is_null());
        }
    }
}
