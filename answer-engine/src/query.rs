//! Question understanding: departure-time threshold and airline filters.

use std::sync::OnceLock;

use regex::Regex;

use crate::time_parse::parse_time_to_minutes;

/// Airlines recognised in questions: canonical token and a spacing-tolerant pattern.
///
/// Alternation order decides which pattern wins when two start at the same offset.
pub const KNOWN_AIRLINES: &[(&str, &str)] = &[
    ("air india", r"air\s*india"),
    ("indigo", r"indigo"),
    ("spicejet", r"spice\s*jet"),
    ("vistara", r"vistara"),
    ("airasia", r"air\s*asia"),
    ("go air", r"go\s*air"),
];

fn after_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"after\s+(\d{1,2}(?::\d{2})?\s*(?:am|pm)?)").expect("valid after regex")
    })
}

fn airline_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let alternation = KNOWN_AIRLINES
            .iter()
            .map(|(_, pattern)| format!("({pattern})"))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&alternation).expect("valid airline regex")
    })
}

/// Filters extracted from one question. Both are optional; absent means unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParsedFilter {
    /// Earliest acceptable departure, in minutes since midnight.
    pub after_minutes: Option<u32>,
    /// Canonical airline token from [`KNOWN_AIRLINES`].
    pub airline: Option<&'static str>,
}

impl ParsedFilter {
    /// Extracts filters from free text. Matching is case-insensitive and never fails.
    pub fn from_question(question: &str) -> Self {
        let q = question.to_lowercase();

        let after_minutes = after_re()
            .captures(&q)
            .and_then(|caps| caps.get(1))
            .and_then(|m| parse_time_to_minutes(m.as_str()));

        let airline = airline_re().captures(&q).and_then(|caps| {
            (1..caps.len())
                .find(|&i| caps.get(i).is_some())
                .map(|i| KNOWN_AIRLINES[i - 1].0)
        });

        Self {
            after_minutes,
            airline,
        }
    }

    /// True when the record's airline name contains the requested airline.
    ///
    /// Both sides are compared lowercased with whitespace removed, so
    /// `"AirIndia"` satisfies `air india`.
    pub fn airline_matches(&self, record_airline: Option<&str>) -> bool {
        let Some(wanted) = self.airline else {
            return true;
        };
        let Some(have) = record_airline else {
            return false;
        };
        compact(have).contains(&compact(wanted))
    }

    /// True when the departure parses and is not earlier than the threshold.
    pub fn departure_matches(&self, departure: Option<&str>) -> bool {
        let Some(after) = self.after_minutes else {
            return true;
        };
        departure
            .and_then(parse_time_to_minutes)
            .is_some_and(|minutes| minutes >= after)
    }
}

fn compact(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
