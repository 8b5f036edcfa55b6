//! Clock-time parsing into minutes since midnight.
//!
//! Strict formats are tried first, in order; the lenient pattern only runs
//! when none of them accepts the whole input.

use std::sync::OnceLock;

use chrono::format::{Parsed, StrftimeItems, parse};
use chrono::{DateTime, NaiveDateTime, Timelike};
use regex::Regex;

/// Clock formats, matched against the upper-cased input.
/// Hour-only formats imply minute zero.
const CLOCK_FORMATS: &[&str] = &["%I:%M %p", "%I %p", "%H:%M", "%H"];

/// Full timestamps some feeds send for `departureAt`.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

fn lenient_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d{1,2})(?::(\d{2}))?\s*(am|pm)?").expect("valid clock regex")
    })
}

/// Converts a time string to minutes since midnight.
///
/// Returns `None` for blank input or when no digits can be found.
pub fn parse_time_to_minutes(raw: &str) -> Option<u32> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    let upper = text.to_uppercase();

    CLOCK_FORMATS
        .iter()
        .find_map(|fmt| parse_clock(&upper, fmt))
        .or_else(|| parse_datetime(&upper))
        .or_else(|| parse_lenient(&text.to_lowercase()))
}

fn parse_clock(text: &str, fmt: &str) -> Option<u32> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, text, StrftimeItems::new(fmt)).ok()?;
    // No-op when the format already captured minutes.
    let _ = parsed.set_minute(0);
    let t = parsed.to_naive_time().ok()?;
    Some(t.hour() * 60 + t.minute())
}

fn parse_datetime(text: &str) -> Option<u32> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.hour() * 60 + dt.minute());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.hour() * 60 + dt.minute())
}

/// `H[:MM][ ]am|pm` anywhere in the text, with 12-hour wraparound.
///
/// Values are not range-checked: `"13 pm"` reads as 25:00.
fn parse_lenient(text: &str) -> Option<u32> {
    let caps = lenient_re().captures(text)?;
    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    match caps.get(3).map(|m| m.as_str()) {
        Some("pm") if hour != 12 => hour += 12,
        Some("am") if hour == 12 => hour = 0,
        _ => {}
    }
    Some(hour * 60 + minute)
}
