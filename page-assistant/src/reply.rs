//! Turns raw model output into a [`ChatAnswer`].
//!
//! A JSON object reply is read field by field. Anything else goes through a
//! lenient extractor: the first `{...}` span becomes the excerpt and the
//! first line becomes the answer. The result is unverified either way.

use std::sync::OnceLock;

use answer_engine::ChatAnswer;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

/// Longest answer kept from a free-text reply.
pub const MAX_FREE_TEXT_ANSWER_CHARS: usize = 500;

fn braces_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid braces regex"))
}

/// Parses a model reply. Never fails; an unusable reply yields an empty answer.
pub fn parse_reply(raw: &str) -> ChatAnswer {
    let text = raw.trim();
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(obj)) => ChatAnswer::new(
            field_text(obj.get("answer")).unwrap_or_default(),
            field_text(obj.get("excerpt")),
        ),
        _ => {
            warn!(reply_len = text.len(), "model reply is not a JSON object, using lenient extraction");
            extract_free_text(text)
        }
    }
}

fn field_text(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn extract_free_text(text: &str) -> ChatAnswer {
    let excerpt = braces_re().find(text).map(|m| m.as_str().to_string());
    let answer: String = text
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .chars()
        .take(MAX_FREE_TEXT_ANSWER_CHARS)
        .collect();
    ChatAnswer::new(answer, excerpt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_object_reply() {
        let a = parse_reply(
            r#" {"answer": "IndiGo at 8 PM", "excerpt": "{\"airline\": \"IndiGo\"}"} "#,
        );
        assert_eq!(a.answer, "IndiGo at 8 PM");
        assert_eq!(a.excerpt.as_deref(), Some(r#"{"airline": "IndiGo"}"#));
    }

    #[test]
    fn empty_or_missing_excerpt_is_absent() {
        assert_eq!(parse_reply(r#"{"answer": "x", "excerpt": ""}"#).excerpt, None);
        assert_eq!(parse_reply(r#"{"answer": "x", "excerpt": null}"#).excerpt, None);
        let a = parse_reply(r#"{"excerpt": "y"}"#);
        assert_eq!(a.answer, "");
        assert_eq!(a.excerpt.as_deref(), Some("y"));
    }

    #[test]
    fn non_string_fields_keep_their_json_text() {
        let a = parse_reply(r#"{"answer": 3000, "excerpt": {"price": 3000}}"#);
        assert_eq!(a.answer, "3000");
        assert_eq!(a.excerpt.as_deref(), Some(r#"{"price":3000}"#));
    }

    #[test]
    fn free_text_reply_uses_first_line_and_brace_span() {
        let raw = "The cheapest is IndiGo.\nSource:\n{\"airline\": \"IndiGo\",\n \"price\": 3000}\ntrailing";
        let a = parse_reply(raw);
        assert_eq!(a.answer, "The cheapest is IndiGo.");
        assert_eq!(
            a.excerpt.as_deref(),
            Some("{\"airline\": \"IndiGo\",\n \"price\": 3000}")
        );
    }

    #[test]
    fn non_object_json_goes_through_extraction() {
        let a = parse_reply(r#"["a", "b"]"#);
        assert_eq!(a.answer, r#"["a", "b"]"#);
        assert_eq!(a.excerpt, None);
    }

    #[test]
    fn free_text_answer_is_capped() {
        let raw = "y".repeat(MAX_FREE_TEXT_ANSWER_CHARS + 50);
        let a = parse_reply(&raw);
        assert_eq!(a.answer.chars().count(), MAX_FREE_TEXT_ANSWER_CHARS);
        assert_eq!(a.excerpt, None);
    }

    #[test]
    fn blank_reply_yields_empty_answer() {
        let a = parse_reply("   ");
        assert_eq!(a.answer, "");
        assert_eq!(a.excerpt, None);
    }
}
