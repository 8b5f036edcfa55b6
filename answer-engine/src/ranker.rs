//! Deterministic answering for flight cards: filter, then pick the cheapest.

use tracing::debug;

use crate::answer::ChatAnswer;
use crate::encode::encode_record;
use crate::query::ParsedFilter;
use crate::record::ContextRecord;

/// Best record seen so far during the scan.
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    record: &'a ContextRecord,
    price: f64,
}

/// Answers `question` from `context` without any model.
///
/// Records without a readable price are ignored. Among records passing the
/// airline and departure filters, the strictly cheapest wins; on equal
/// prices the earlier record is kept. The excerpt is the winning record's
/// encoding, so it is always a substring of the encoded context.
pub fn interpret(question: &str, context: &[ContextRecord]) -> ChatAnswer {
    let filter = ParsedFilter::from_question(question);
    debug!(
        after_minutes = ?filter.after_minutes,
        airline = ?filter.airline,
        records = context.len(),
        "parsed question filters"
    );

    let best = select_cheapest(&filter, context);

    match best {
        Some(c) => {
            let airline = c
                .record
                .airline()
                .unwrap_or_else(|| "Unknown Airline".to_string());
            let departs = c
                .record
                .departure_time()
                .unwrap_or_else(|| "Unknown".to_string());
            let from_clause = if filter.airline.is_some() {
                format!(" from {airline}")
            } else {
                String::new()
            };
            let answer = format!(
                "Cheapest flight{from_clause} is {airline}, departs at {departs}, price {}.",
                format_price(c.price)
            );
            ChatAnswer::new(answer, Some(encode_record(c.record)))
        }
        None => ChatAnswer::fallback(),
    }
}

fn select_cheapest<'a>(filter: &ParsedFilter, context: &'a [ContextRecord]) -> Option<Candidate<'a>> {
    let mut best: Option<Candidate<'a>> = None;

    for record in context {
        let Some(price) = record.price() else {
            continue;
        };
        if !filter.airline_matches(record.airline().as_deref()) {
            continue;
        }
        if !filter.departure_matches(record.departure_time().as_deref()) {
            continue;
        }
        if best.is_none_or(|b| price < b.price) {
            best = Some(Candidate { record, price });
        }
    }

    best
}

/// Whole prices keep one decimal (`5000.0`); others print as-is (`4500.5`).
/// Renders a price the way it reads in the page data: whole numbers keep a
/// trailing `.0`, very large or tiny magnitudes switch to `1.5e+20` form.
fn format_price(price: f64) -> String {
    let magnitude = price.abs();
    if !price.is_finite() || (magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude)) {
        return scientific(price);
    }
    if price.fract() == 0.0 {
        format!("{price:.1}")
    } else {
        format!("{price}")
    }
}

fn scientific(price: f64) -> String {
    if price.is_nan() {
        return "nan".to_string();
    }
    let raw = format!("{price:e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => raw,
    }
}
