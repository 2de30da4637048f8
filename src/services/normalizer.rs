//! Turns raw completion text into validated recommendation records.
//!
//! Models do not reliably honour "JSON only" instructions. Responses come back
//! wrapped in code fences, with a sentence of prose before or after, or cut
//! off mid-array. The normalizer cleans the text, takes the span from the
//! first `[` to the last `]`, parses it, and checks every element.
//!
//! Any element that is not an object with non-empty string `title`, `genre`
//! and `reason` fails the whole batch. Every failure keeps the cleaned text so
//! operators can see what the model actually produced.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Display;

use crate::models::RecommendationRecord;

static JSON_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)```json").unwrap());

const BARE_FENCE: &str = "```";
const REQUIRED_FIELDS: [&str; 3] = ["title", "genre", "reason"];

/// Stage at which normalization gave up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationErrorKind {
    /// No JSON array could be located in the text
    InvalidFormat,
    /// The extracted span is not valid JSON
    ParseError,
    /// Valid JSON, but not an array of recommendation objects
    SchemaViolation,
}

impl Display for NormalizationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizationErrorKind::InvalidFormat => write!(f, "invalid format"),
            NormalizationErrorKind::ParseError => write!(f, "parse error"),
            NormalizationErrorKind::SchemaViolation => write!(f, "schema violation"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid AI response ({kind}): {detail}")]
pub struct NormalizationError {
    pub kind: NormalizationErrorKind,
    pub detail: String,
    /// Cleaned completion text
    pub raw_output: String,
}

impl NormalizationError {
    fn new(kind: NormalizationErrorKind, detail: impl Into<String>, cleaned: &str) -> Self {
        Self {
            kind,
            detail: detail.into(),
            raw_output: cleaned.to_string(),
        }
    }
}

/// Removes every ```json marker (any case) and every bare ``` fence, then trims
pub fn strip_fences(raw: &str) -> String {
    JSON_FENCE
        .replace_all(raw, "")
        .replace(BARE_FENCE, "")
        .trim()
        .to_string()
}

/// Returns the span from the first `[` to the last `]`.
///
/// When no `]` follows the first `[` the span runs to the end of the text,
/// which leaves the parser to report the truncation.
pub fn extract_array_span(cleaned: &str) -> Option<&str> {
    let start = cleaned.find('[')?;
    match cleaned.rfind(']') {
        Some(end) if end > start => Some(&cleaned[start..=end]),
        _ => Some(&cleaned[start..]),
    }
}

fn required_string(
    object: &Map<String, Value>,
    index: usize,
    field: &str,
) -> Result<String, String> {
    match object.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::String(_)) => Err(format!("element {} has an empty \"{}\"", index, field)),
        Some(_) => Err(format!("element {} field \"{}\" is not a string", index, field)),
        None => Err(format!("element {} is missing \"{}\"", index, field)),
    }
}

fn validate_record(index: usize, value: &Value) -> Result<RecommendationRecord, String> {
    let object = value
        .as_object()
        .ok_or_else(|| format!("element {} is not an object", index))?;

    let [title, genre, reason] = REQUIRED_FIELDS;
    Ok(RecommendationRecord {
        title: required_string(object, index, title)?,
        genre: required_string(object, index, genre)?,
        reason: required_string(object, index, reason)?,
    })
}

/// Normalizes a raw completion into recommendation records.
///
/// Records keep the order the model produced them in.
pub fn normalize(raw: &str) -> Result<Vec<RecommendationRecord>, NormalizationError> {
    let cleaned = strip_fences(raw);

    let span = extract_array_span(&cleaned).ok_or_else(|| {
        NormalizationError::new(
            NormalizationErrorKind::InvalidFormat,
            "no JSON array found in response",
            &cleaned,
        )
    })?;

    let parsed: Value = serde_json::from_str(span).map_err(|e| {
        NormalizationError::new(NormalizationErrorKind::ParseError, e.to_string(), &cleaned)
    })?;

    let elements = parsed.as_array().ok_or_else(|| {
        NormalizationError::new(
            NormalizationErrorKind::SchemaViolation,
            "response is not a JSON array",
            &cleaned,
        )
    })?;

    elements
        .iter()
        .enumerate()
        .map(|(index, value)| validate_record(index, value))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|detail| {
            NormalizationError::new(NormalizationErrorKind::SchemaViolation, detail, &cleaned)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN: &str = r#"[{"title":"A","genre":"G","reason":"R"}]"#;

    fn record(title: &str, genre: &str, reason: &str) -> RecommendationRecord {
        RecommendationRecord {
            title: title.to_string(),
            genre: genre.to_string(),
            reason: reason.to_string(),
        }
    }

    fn kind_of(raw: &str) -> NormalizationErrorKind {
        normalize(raw).unwrap_err().kind
    }

    #[test]
    fn test_clean_json() {
        assert_eq!(normalize(CLEAN).unwrap(), vec![record("A", "G", "R")]);
    }

    #[test]
    fn test_fenced_json() {
        let raw = format!("```json\n{}\n```", CLEAN);
        assert_eq!(normalize(&raw).unwrap(), vec![record("A", "G", "R")]);
    }

    #[test]
    fn test_fence_marker_case_insensitive() {
        let raw = format!("```JSON\n{}\n```", CLEAN);
        assert_eq!(normalize(&raw).unwrap(), vec![record("A", "G", "R")]);
    }

    #[test]
    fn test_fences_in_the_middle_are_removed() {
        let raw = "Here you go:\n```json\n[{\"title\":\"A\",\"genre\":\"G\",\"reason\":\"R\"},\n```\n```json\n{\"title\":\"B\",\"genre\":\"H\",\"reason\":\"S\"}]\n```";
        assert_eq!(
            normalize(raw).unwrap(),
            vec![record("A", "G", "R"), record("B", "H", "S")]
        );
    }

    #[test]
    fn test_strip_fences_trims() {
        assert_eq!(strip_fences("  ```json\n[]\n```  \n"), "[]");
    }

    #[test]
    fn test_no_brackets_is_invalid_format() {
        let error = normalize("Sure! Here are some movies: not json").unwrap_err();
        assert_eq!(error.kind, NormalizationErrorKind::InvalidFormat);
        assert_eq!(error.raw_output, "Sure! Here are some movies: not json");
    }

    #[test]
    fn test_truncated_is_parse_error() {
        assert_eq!(kind_of(r#"[{"title":"A""#), NormalizationErrorKind::ParseError);
    }

    #[test]
    fn test_trailing_commentary_is_ignored() {
        let raw = format!("{} Hope you enjoy!", CLEAN);
        assert_eq!(normalize(&raw).unwrap(), vec![record("A", "G", "R")]);
    }

    #[test]
    fn test_leading_prose_is_ignored() {
        let raw = format!("Sure! Here are five picks:\n{}", CLEAN);
        assert_eq!(normalize(&raw).unwrap(), vec![record("A", "G", "R")]);
    }

    #[test]
    fn test_two_independent_arrays_use_widest_span() {
        let raw = format!("{} and also {}", CLEAN, CLEAN);
        assert_eq!(kind_of(&raw), NormalizationErrorKind::ParseError);
    }

    #[test]
    fn test_closing_bracket_before_opening() {
        assert_eq!(kind_of("] oops ["), NormalizationErrorKind::ParseError);
    }

    #[test]
    fn test_raw_output_is_cleaned_text() {
        let error = normalize("```json\n[{\"title\": \n```").unwrap_err();
        assert_eq!(error.kind, NormalizationErrorKind::ParseError);
        assert_eq!(error.raw_output, "[{\"title\":");
    }

    #[test]
    fn test_empty_array_is_ok() {
        assert_eq!(normalize("[]").unwrap(), vec![]);
    }

    #[test]
    fn test_order_preserved() {
        let raw = r#"[
            {"title":"Zodiac","genre":"Thriller","reason":"r1"},
            {"title":"Arrival","genre":"Sci-Fi","reason":"r2"},
            {"title":"Memento","genre":"Mystery","reason":"r3"}
        ]"#;
        let titles: Vec<String> = normalize(raw).unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["Zodiac", "Arrival", "Memento"]);
    }

    #[test]
    fn test_values_are_trimmed_and_extra_keys_ignored() {
        let raw = r#"[{"title":" A ","genre":"G ","reason":" R","year":1999}]"#;
        assert_eq!(normalize(raw).unwrap(), vec![record("A", "G", "R")]);
    }

    #[test]
    fn test_missing_field_rejects_batch() {
        let raw = r#"[{"title":"A","genre":"G","reason":"R"},{"title":"B","genre":"G"}]"#;
        let error = normalize(raw).unwrap_err();
        assert_eq!(error.kind, NormalizationErrorKind::SchemaViolation);
        assert!(error.detail.contains("element 1"));
        assert!(error.detail.contains("reason"));
    }

    #[test]
    fn test_non_string_field_rejects_batch() {
        let raw = r#"[{"title":"A","genre":["Drama"],"reason":"R"}]"#;
        let error = normalize(raw).unwrap_err();
        assert_eq!(error.kind, NormalizationErrorKind::SchemaViolation);
        assert!(error.detail.contains("not a string"));
    }

    #[test]
    fn test_empty_field_rejects_batch() {
        let raw = r#"[{"title":"   ","genre":"G","reason":"R"}]"#;
        assert_eq!(kind_of(raw), NormalizationErrorKind::SchemaViolation);
    }

    #[test]
    fn test_non_object_element_rejects_batch() {
        let raw = r#"[{"title":"A","genre":"G","reason":"R"}, "B"]"#;
        let error = normalize(raw).unwrap_err();
        assert_eq!(error.kind, NormalizationErrorKind::SchemaViolation);
        assert!(error.detail.contains("not an object"));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&NormalizationErrorKind::SchemaViolation).unwrap();
        assert_eq!(json, "\"schema_violation\"");
    }
}
