//! Extraction of the suggestion object from free model text.
//!
//! The model is asked for a JSON object but usually wraps it in prose. The
//! object is taken to end at the last `}`; it starts at the first `{` that
//! yields a parseable object from there. Nothing untyped leaves this module.

use serde_json::Value;

use crate::error::{RecommenderError, RecommenderResult};
use crate::models::GeneralSuggestion;
use crate::prompt::RESPONSE_KEY;

pub fn parse_suggestions(raw: &str) -> RecommenderResult<GeneralSuggestion> {
    let end = raw.rfind('}').ok_or_else(|| {
        RecommenderError::MalformedResponse("model response contains no JSON object".to_string())
    })?;
    let candidate = &raw[..=end];

    let object = candidate
        .match_indices('{')
        .find_map(|(start, _)| {
            serde_json::from_str::<Value>(&candidate[start..])
                .ok()
                .filter(Value::is_object)
        })
        .ok_or_else(|| {
            RecommenderError::MalformedResponse(format!(
                "no parseable JSON object in model response: {}",
                truncate(candidate, 200)
            ))
        })?;

    if object.get(RESPONSE_KEY).is_none() {
        return Err(RecommenderError::MalformedResponse(format!(
            "model response object has no '{}' key",
            RESPONSE_KEY
        )));
    }

    serde_json::from_value(object).map_err(|e| {
        RecommenderError::MalformedResponse(format!("'{}' is not a list of strings: {}", RESPONSE_KEY, e))
    })
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prose_around_object_is_ignored() {
        let raw = r#"Sure! Based on the purchases, here is my answer:
{"next_items": ["winter boots", "gloves", "wool socks", "hand warmers", "thermal underwear"]}
Let me know if you need more."#;

        let suggestion = parse_suggestions(raw).unwrap();
        assert_eq!(suggestion.next_items.len(), 5);
        assert_eq!(suggestion.next_items[0], "winter boots");
    }

    #[test]
    fn test_nested_object_uses_outermost() {
        let raw = r#"{"next_items": ["gloves"], "meta": {"confidence": "high"}}"#;
        assert_eq!(parse_suggestions(raw).unwrap().next_items, vec!["gloves"]);
    }

    #[test]
    fn test_stray_brace_in_prose_is_skipped() {
        let raw = r#"Format {as requested}: {"next_items": ["mittens"]}"#;
        assert_eq!(parse_suggestions(raw).unwrap().next_items, vec!["mittens"]);
    }

    #[test]
    fn test_no_closing_brace_is_malformed() {
        let err = parse_suggestions("I would suggest boots and gloves.").unwrap_err();
        assert!(matches!(err, RecommenderError::MalformedResponse(_)));
    }

    #[test]
    fn test_truncated_object_is_malformed() {
        let err = parse_suggestions(r#"{"next_items": ["boots", }"#).unwrap_err();
        assert!(matches!(err, RecommenderError::MalformedResponse(_)));
    }

    #[test]
    fn test_missing_key_is_malformed() {
        let err = parse_suggestions(r#"{"items": ["boots"]}"#).unwrap_err();
        assert!(matches!(err, RecommenderError::MalformedResponse(msg) if msg.contains("next_items")));
    }

    #[test]
    fn test_non_string_items_are_malformed() {
        let err = parse_suggestions(r#"{"next_items": [1, 2]}"#).unwrap_err();
        assert!(matches!(err, RecommenderError::MalformedResponse(_)));
    }
}
