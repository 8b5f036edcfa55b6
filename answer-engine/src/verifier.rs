//! Excerpt guardrail: an excerpt may only be shown if it is quoted from the page.
//!
//! Exact containment is checked first. Only when that fails are both sides
//! normalized (whitespace runs collapsed, lowercased) and compared again,
//! which tolerates re-serialization noise from a model without accepting
//! different words.

/// How an excerpt was matched against the page context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Byte-exact substring of the context.
    Exact,
    /// Substring after whitespace/case normalization.
    Normalized,
    /// Not found, or one of the inputs was empty.
    Rejected,
}

impl Verification {
    pub fn is_verified(self) -> bool {
        !matches!(self, Verification::Rejected)
    }
}

/// Returns `true` when `excerpt` is quoted from `context_blob`.
pub fn verify(context_blob: &str, excerpt: Option<&str>) -> bool {
    check(context_blob, excerpt).is_verified()
}

/// Same as [`verify`] but reports which comparison accepted the excerpt.
pub fn check(context_blob: &str, excerpt: Option<&str>) -> Verification {
    let Some(excerpt) = excerpt else {
        return Verification::Rejected;
    };
    if excerpt.is_empty() || context_blob.is_empty() {
        return Verification::Rejected;
    }

    if context_blob.contains(excerpt) {
        return Verification::Exact;
    }

    let wanted = normalize(excerpt);
    if !wanted.is_empty() && normalize(context_blob).contains(&wanted) {
        Verification::Normalized
    } else {
        Verification::Rejected
    }
}

/// Lowercases and collapses every whitespace run to one space, trimming the ends.
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
