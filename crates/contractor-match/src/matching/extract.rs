//! Recovery of the ranked top 3 from free-form oracle text.
//!
//! The oracle is asked for bare JSON but routinely wraps it in markdown fences
//! or prose. Each [`ParseStrategy`] tries one recovery technique; the first
//! one that yields a JSON object wins, and only then is the output contract
//! enforced.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::domain::ContractorMatch;

/// Maximum number of matches returned to the caller.
pub const MATCH_LIMIT: usize = 3;
pub const DEFAULT_REASON: &str = "Good match based on preferences";

const MIN_TRUST_SCORE: f64 = 0.0;
const MAX_TRUST_SCORE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to parse oracle response: {0}")]
    Parse(String),
    #[error("invalid oracle response: {0}")]
    Validation(String),
}

/// One way of locating a JSON object inside raw oracle text.
pub struct ParseStrategy {
    pub name: &'static str,
    pub attempt: fn(&str) -> Option<Value>,
}

/// Applied in order; the first success short-circuits the rest.
pub const PARSE_STRATEGIES: &[ParseStrategy] = &[
    ParseStrategy {
        name: "direct",
        attempt: parse_direct,
    },
    ParseStrategy {
        name: "fenced",
        attempt: parse_fenced,
    },
    ParseStrategy {
        name: "embedded",
        attempt: parse_embedded,
    },
];

/// Parse and validate the oracle's ranking.
pub fn extract_top3(raw_text: &str) -> Result<Vec<ContractorMatch>, ExtractError> {
    let parsed = parse_response(raw_text)?;
    validate(&parsed)
}

pub fn parse_response(raw_text: &str) -> Result<Value, ExtractError> {
    for strategy in PARSE_STRATEGIES {
        match (strategy.attempt)(raw_text) {
            Some(value) => {
                debug!(strategy = strategy.name, "oracle response parsed");
                return Ok(value);
            }
            None => debug!(strategy = strategy.name, "parse strategy did not match"),
        }
    }

    Err(ExtractError::Parse("no valid JSON found".to_string()))
}

fn parse_object(candidate: &str) -> Option<Value> {
    serde_json::from_str::<Value>(candidate.trim())
        .ok()
        .filter(Value::is_object)
}

fn parse_direct(raw_text: &str) -> Option<Value> {
    parse_object(raw_text)
}

/// Interior of the first fenced block that holds an object, with or without a `json` tag.
fn parse_fenced(raw_text: &str) -> Option<Value> {
    const FENCE: &str = "```";

    let mut rest = raw_text;
    while let Some(open) = rest.find(FENCE) {
        let after_open = &rest[open + FENCE.len()..];
        let close = after_open.find(FENCE)?;
        let mut body = &after_open[..close];
        if let Some(untagged) = body.trim_start().strip_prefix("json") {
            body = untagged;
        }
        if let Some(value) = parse_object(body) {
            return Some(value);
        }
        rest = &after_open[close + FENCE.len()..];
    }

    None
}

/// First balanced `{...}` span that parses as an object, trying each opening
/// brace in turn, falling back to the widest outer-brace span.
fn parse_embedded(raw_text: &str) -> Option<Value> {
    let start = raw_text.find('{')?;
    let embedded = raw_text
        .match_indices('{')
        .filter_map(|(open, _)| {
            let end = balanced_object_end(&raw_text[open..])?;
            parse_object(&raw_text[open..open + end])
        })
        .next();
    if embedded.is_some() {
        return embedded;
    }

    let end = raw_text.rfind('}')?;
    (end > start)
        .then(|| parse_object(&raw_text[start..=end]))
        .flatten()
}

/// Byte length of the object starting at `text[0] == '{'`, honoring JSON strings.
fn balanced_object_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(index + ch.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}

/// Enforce the output contract on a parsed oracle object.
pub fn validate(parsed: &Value) -> Result<Vec<ContractorMatch>, ExtractError> {
    let entries = parsed
        .get("top3")
        .and_then(Value::as_array)
        .filter(|entries| !entries.is_empty())
        .ok_or_else(|| ExtractError::Validation("missing or empty top3".to_string()))?;

    entries
        .iter()
        .take(MATCH_LIMIT)
        .enumerate()
        .map(|(index, entry)| validate_entry(index, entry))
        .collect()
}

fn validate_entry(index: usize, entry: &Value) -> Result<ContractorMatch, ExtractError> {
    let invalid = || {
        warn!(index, entry = %entry, "oracle returned an invalid match");
        ExtractError::Validation(format!("invalid match structure at index {index}"))
    };

    let fields = entry.as_object().ok_or_else(invalid)?;
    let id = required_text(fields, "id").ok_or_else(invalid)?;
    let name = required_text(fields, "name").ok_or_else(invalid)?;
    let trust_score = coerce_score(fields.get("trust_score"));
    let reason = fields
        .get("reason")
        .and_then(Value::as_str)
        .filter(|reason| !reason.is_empty())
        .unwrap_or(DEFAULT_REASON)
        .to_string();

    Ok(ContractorMatch {
        id,
        name,
        trust_score,
        reason,
    })
}

/// Non-empty string, or a number rendered as text.
fn required_text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Missing or unusable scores become 0; everything is clamped into 0-100.
fn coerce_score(value: Option<&Value>) -> f64 {
    let score = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|score| !score.is_nan())
    .unwrap_or(MIN_TRUST_SCORE);

    score.clamp(MIN_TRUST_SCORE, MAX_TRUST_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json() {
        let raw = r#"{"top3":[{"id":"c1","name":"NorthPeak Roofing","trust_score":88.5,"reason":"Deep roofing experience"}]}"#;
        let matches = extract_top3(raw).expect("extracts");
        assert_eq!(
            matches,
            vec![ContractorMatch {
                id: "c1".to_string(),
                name: "NorthPeak Roofing".to_string(),
                trust_score: 88.5,
                reason: "Deep roofing experience".to_string(),
            }]
        );
    }

    #[test]
    fn fenced_block_is_unwrapped_and_score_clamped() {
        let raw = "```json\n{\"top3\":[{\"id\":\"c1\",\"name\":\"X\",\"trust_score\":150,\"reason\":\"r\"}]}\n```";
        let matches = extract_top3(raw).expect("extracts");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].trust_score, 100.0);
        assert_eq!(matches[0].reason, "r");
    }

    #[test]
    fn untagged_fence_inside_prose_is_found() {
        let raw = "Here you go:\n```\n{\"top3\":[{\"id\":\"c4\",\"name\":\"Granite\",\"trust_score\":71}]}\n```\nLet me know!";
        let matches = extract_top3(raw).expect("extracts");
        assert_eq!(matches[0].id, "c4");
        assert_eq!(matches[0].reason, DEFAULT_REASON);
    }

    #[test]
    fn prose_wrapped_object_is_found() {
        let raw = "Sure! Based on the weights {\"top3\":[{\"id\":\"c2\",\"name\":\"Beehive {Home} Repair\",\"trust_score\":64.2,\"reason\":\"Affordable\"}]} hope this helps {not json}";
        let matches = extract_top3(raw).expect("extracts");
        assert_eq!(matches[0].name, "Beehive {Home} Repair");
    }

    #[test]
    fn stray_brace_in_prose_does_not_hide_the_object() {
        let raw = "Weighing {experience, reviews} as asked: {\"top3\":[{\"id\":\"c3\",\"name\":\"Summit Exteriors\",\"trust_score\":79,\"reason\":\"Strong reviews\"}]}";
        let matches = extract_top3(raw).expect("extracts");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "c3");
        assert_eq!(matches[0].trust_score, 79.0);
    }

    #[test]
    fn text_without_json_is_a_parse_error() {
        let err = extract_top3("I'm sorry, I cannot rank these contractors.").expect_err("fails");
        assert_eq!(err, ExtractError::Parse("no valid JSON found".to_string()));

        let err = extract_top3("{ this is not json }").expect_err("fails");
        assert!(matches!(err, ExtractError::Parse(_)));
    }

    #[test]
    fn empty_or_missing_top3_is_a_validation_error() {
        let err = extract_top3(r#"{"top3":[]}"#).expect_err("fails");
        assert_eq!(
            err,
            ExtractError::Validation("missing or empty top3".to_string())
        );
        assert!(matches!(
            extract_top3(r#"{"matches":[{"id":"c1"}]}"#),
            Err(ExtractError::Validation(_))
        ));
        assert!(matches!(
            extract_top3(r#"{"top3":{"id":"c1"}}"#),
            Err(ExtractError::Validation(_))
        ));
    }

    #[test]
    fn truncates_to_three_without_padding() {
        let raw = r#"{"top3":[
            {"id":"c1","name":"A","trust_score":90,"reason":"a"},
            {"id":"c2","name":"B","trust_score":80,"reason":"b"},
            {"id":"c3","name":"C","trust_score":70,"reason":"c"},
            {"id":"c4","name":"D","trust_score":60,"reason":"d"}
        ]}"#;
        let ids: Vec<String> = extract_top3(raw)
            .expect("extracts")
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["c1", "c2", "c3"]);

        let short = r#"{"top3":[{"id":"c1","name":"A","trust_score":90,"reason":"a"},{"id":"c2","name":"B","trust_score":80,"reason":"b"}]}"#;
        assert_eq!(extract_top3(short).expect("extracts").len(), 2);
    }

    #[test]
    fn entry_without_name_names_its_index() {
        let raw = r#"{"top3":[{"id":"c1","name":"A"},{"id":"c2","name":""}]}"#;
        let err = extract_top3(raw).expect_err("fails");
        assert_eq!(
            err,
            ExtractError::Validation("invalid match structure at index 1".to_string())
        );

        let raw = r#"{"top3":[{"name":"A"}]}"#;
        assert_eq!(
            extract_top3(raw).expect_err("fails"),
            ExtractError::Validation("invalid match structure at index 0".to_string())
        );
    }

    #[test]
    fn entries_beyond_the_limit_are_not_validated() {
        let raw = r#"{"top3":[{"id":"c1","name":"A"},{"id":"c2","name":"B"},{"id":"c3","name":"C"},{"bogus":true}]}"#;
        assert_eq!(extract_top3(raw).expect("extracts").len(), 3);
    }

    #[test]
    fn trust_score_is_coerced() {
        assert_eq!(coerce_score(None), 0.0);
        assert_eq!(coerce_score(Some(&Value::Null)), 0.0);
        assert_eq!(coerce_score(Some(&Value::Bool(true))), 0.0);
        assert_eq!(coerce_score(Some(&serde_json::json!(-12.5))), 0.0);
        assert_eq!(coerce_score(Some(&serde_json::json!(101))), 100.0);
        assert_eq!(coerce_score(Some(&serde_json::json!("77.5"))), 77.5);
        assert_eq!(coerce_score(Some(&serde_json::json!("high"))), 0.0);
    }

    #[test]
    fn numeric_ids_are_accepted() {
        let raw = r#"{"top3":[{"id":5,"name":"QuickFix Pros","trust_score":60}]}"#;
        assert_eq!(extract_top3(raw).expect("extracts")[0].id, "5");
    }
}
