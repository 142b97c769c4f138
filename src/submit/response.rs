//! Wire shapes returned by the recognition endpoint.
//!
//! Two response layouts exist in the wild: a bare JSON array of
//! `{"expr": ..., "result": ...}` objects, and an object wrapping the same
//! records under a `results` key. Older deployments return a single record
//! instead of an array. All three normalize to `Vec<RecognitionEntry>`.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionEntry {
    /// The expression label, when the service echoes one back.
    pub expr: Option<String>,
    /// The recognized value rendered as display text.
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseWire {
    Entries(Vec<EntryWire>),
    Wrapped { results: Vec<EntryWire> },
    Single(EntryWire),
}

#[derive(Debug, Deserialize)]
struct EntryWire {
    #[serde(default)]
    expr: Option<String>,
    result: Value,
}

pub fn parse_response(body: &[u8]) -> Result<Vec<RecognitionEntry>> {
    let wire: ResponseWire =
        serde_json::from_slice(body).context("parse recognition response body")?;
    let entries = match wire {
        ResponseWire::Entries(entries) => entries,
        ResponseWire::Wrapped { results } => results,
        ResponseWire::Single(entry) => vec![entry],
    };
    Ok(entries
        .into_iter()
        .map(|entry| RecognitionEntry {
            expr: entry.expr.filter(|expr| !expr.trim().is_empty()),
            value: render_value(&entry.result),
        })
        .collect())
}

/// Format recognition entries into one display line, or the placeholder when
/// the service recognized nothing.
pub fn format_entries(entries: &[RecognitionEntry], empty_placeholder: &str) -> String {
    if entries.is_empty() {
        return empty_placeholder.to_string();
    }
    entries
        .iter()
        .map(|entry| match &entry.expr {
            Some(expr) => format!("{expr}: {}", entry.value),
            None => entry.value.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array_shape() {
        let entries = parse_response(br#"[{"expr":"2+2","result":"4"}]"#).expect("parse");
        assert_eq!(
            entries,
            vec![RecognitionEntry {
                expr: Some("2+2".into()),
                value: "4".into(),
            }]
        );
    }

    #[test]
    fn parses_wrapped_results_shape() {
        let entries =
            parse_response(br#"{"results":[{"result":42},{"expr":"x","result":"1"}]}"#)
                .expect("parse");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].expr, None);
        assert_eq!(entries[0].value, "42");
        assert_eq!(entries[1].expr.as_deref(), Some("x"));
    }

    #[test]
    fn parses_single_record_shape() {
        let entries = parse_response(br#"{"expr":"7-3","result":4}"#).expect("parse");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].expr.as_deref(), Some("7-3"));
        assert_eq!(entries[0].value, "4");
    }

    #[test]
    fn numeric_results_render_as_text() {
        let entries = parse_response(br#"[{"expr":"1/2","result":0.5}]"#).expect("parse");
        assert_eq!(entries[0].value, "0.5");
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(parse_response(b"<html>busy</html>").is_err());
        assert!(parse_response(br#"[{"expr":"2+2"}]"#).is_err());
    }

    #[test]
    fn formatting_joins_entries_with_comma_separator() {
        let entries = vec![
            RecognitionEntry {
                expr: Some("2+2".into()),
                value: "4".into(),
            },
            RecognitionEntry {
                expr: None,
                value: "9".into(),
            },
        ];
        assert_eq!(format_entries(&entries, "No results found"), "2+2: 4, 9");
    }

    #[test]
    fn formatting_empty_entries_yields_placeholder() {
        assert_eq!(format_entries(&[], "No results found"), "No results found");
    }
}
