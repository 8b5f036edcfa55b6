//! Prompt builder: fixed system message + question and clamped page context.

use answer_engine::FALLBACK_ANSWER;

/// System instructions for answering from page context only.
pub fn system_prompt() -> String {
    format!(
        "You are the HappyFares travel assistant embedded on a search results page.\n\
         Answer ONLY from the page context supplied by the user message. Never use outside knowledge.\n\
         If the context does not contain the information, reply with exactly: \"{FALLBACK_ANSWER}\" and an empty excerpt.\n\
         Otherwise include ONE short excerpt copied verbatim from the context that supports the answer.\n\
         Reply strictly as a JSON object with the keys \"answer\" and \"excerpt\" and nothing else."
    )
}

/// Builds the user message with the encoded context clamped to `max_chars`.
///
/// # Example
/// ```
/// # use page_assistant::prompt::build_user_prompt;
/// let p = build_user_prompt("cheapest?", "[]", 100);
/// assert!(p.starts_with("Question: cheapest?"));
/// ```
pub fn build_user_prompt(question: &str, context_blob: &str, max_chars: usize) -> String {
    format!(
        "Question: {}\n\nContext (use only this data to answer):\n{}",
        question.trim(),
        safe_truncate(context_blob, max_chars)
    )
}

fn safe_truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        s
    } else {
        let mut end = max;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}
