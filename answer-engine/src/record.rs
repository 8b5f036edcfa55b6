//! Page records and alias-based field resolution.
//!
//! Page data comes from many scrapers and partner feeds, so each semantic
//! field is looked up through an ordered alias table. The first alias that
//! holds a usable value wins; later aliases are never consulted.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Aliases for the offer price, in lookup order.
pub const PRICE_KEYS: &[&str] = &["price", "fare", "amount"];

/// Aliases for the operating airline, in lookup order.
pub const AIRLINE_KEYS: &[&str] = &["airline", "carrier", "airline_name"];

/// Top-level aliases for the departure time, in lookup order.
pub const DEPARTURE_KEYS: &[&str] = &["departure_time", "dep_time", "departure", "departureAt", "dep"];

/// Key holding the itinerary legs.
pub const SEGMENTS_KEY: &str = "segments";

/// Departure aliases probed on the first segment when the top level has none.
pub const SEGMENT_DEPARTURE_KEYS: &[&str] = &["dep_time", "departure_time", "departure"];

/// One item of page data (e.g. a flight card), kept with its original field order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextRecord(Map<String, Value>);

impl ContextRecord {
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Parsed price from the first non-null price alias.
    ///
    /// Returns `None` when that value cannot be read as a number; the next
    /// alias is not tried in that case.
    pub fn price(&self) -> Option<f64> {
        first_non_null(&self.0, PRICE_KEYS).and_then(parse_price)
    }

    /// Airline name from the first alias holding text.
    pub fn airline(&self) -> Option<String> {
        first_text(&self.0, AIRLINE_KEYS)
    }

    /// Raw departure time, falling back to the first itinerary segment.
    pub fn departure_time(&self) -> Option<String> {
        if let Some(dep) = first_text(&self.0, DEPARTURE_KEYS) {
            return Some(dep);
        }
        let first_segment = self
            .0
            .get(SEGMENTS_KEY)
            .and_then(Value::as_array)
            .and_then(|segments| segments.first())
            .and_then(Value::as_object)?;
        first_text(first_segment, SEGMENT_DEPARTURE_KEYS)
    }
}

fn first_non_null<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| fields.get(*k))
        .find(|v| !v.is_null())
}

fn first_text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|k| fields.get(*k)).find_map(value_text)
}

/// Scalar value rendered as text; empty strings and non-scalars yield `None`.
fn value_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn price_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid price regex"))
}

/// Reads a price from a JSON number or from the first numeric token of a string.
///
/// Thousands separators are dropped before scanning, so `"₹4,500"` reads as
/// `4500.0`. Any other JSON type is unparseable.
pub fn parse_price(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned = s.replace(',', "");
            price_token_re()
                .find(&cleaned)
                .and_then(|m| m.as_str().parse::<f64>().ok())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(v: Value) -> ContextRecord {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn price_accepts_numbers_and_currency_strings() {
        assert_eq!(parse_price(&json!(5000)), Some(5000.0));
        assert_eq!(parse_price(&json!(4999.5)), Some(4999.5));
        assert_eq!(parse_price(&json!("₹4,500")), Some(4500.0));
        assert_eq!(parse_price(&json!("INR 1,23,456.75 per adult")), Some(123456.75));
        assert_eq!(parse_price(&json!("free")), None);
        assert_eq!(parse_price(&json!(true)), None);
        assert_eq!(parse_price(&json!([100])), None);
    }

    #[test]
    fn price_uses_first_non_null_alias_only() {
        assert_eq!(rec(json!({"fare": "3,000", "amount": 10})).price(), Some(3000.0));
        assert_eq!(rec(json!({"price": null, "amount": 10})).price(), Some(10.0));
        // An unreadable price does not fall through to the next alias.
        assert_eq!(rec(json!({"price": "call us", "fare": 900})).price(), None);
        assert_eq!(rec(json!({"airline": "IndiGo"})).price(), None);
    }

    #[test]
    fn airline_follows_alias_order() {
        let r = rec(json!({"airline_name": "Vistara", "carrier": "IndiGo"}));
        assert_eq!(r.airline().as_deref(), Some("IndiGo"));

        let r = rec(json!({"airline": "", "carrier": "SpiceJet"}));
        assert_eq!(r.airline().as_deref(), Some("SpiceJet"));
    }

    #[test]
    fn departure_prefers_top_level_then_first_segment() {
        let r = rec(json!({"dep": "06:10", "departure_time": "7:00 PM"}));
        assert_eq!(r.departure_time().as_deref(), Some("7:00 PM"));

        let r = rec(json!({
            "segments": [
                {"departure": "21:45", "dep_time": "9:40 PM"},
                {"dep_time": "11:00 PM"}
            ]
        }));
        assert_eq!(r.departure_time().as_deref(), Some("9:40 PM"));

        let r = rec(json!({"segments": []}));
        assert_eq!(r.departure_time(), None);

        let r = rec(json!({"departureAt": 18}));
        assert_eq!(r.departure_time().as_deref(), Some("18"));
    }

    #[test]
    fn field_order_is_preserved() {
        let r: ContextRecord =
            serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let keys: Vec<&str> = r.fields().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }
}
