//! Stable text encoding of page records.
//!
//! The encoding is the reference text for excerpt verification, so a record
//! encoded on its own must appear byte-for-byte inside the encoding of any
//! collection that contains it. Layout: `{"k": v, "k2": v2}` and `[a, b]`,
//! field order as received, non-ASCII kept verbatim.

use std::io;

use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::Formatter;
use tracing::warn;

use crate::record::ContextRecord;

/// Compact JSON with a space after every `,` and `:`.
#[derive(Debug, Clone, Copy, Default)]
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Encodes one record.
pub fn encode_record(record: &ContextRecord) -> String {
    encode(record)
}

/// Encodes a whole page context as a JSON array of records.
pub fn encode_records(records: &[ContextRecord]) -> String {
    encode(records)
}

fn encode<T: Serialize + ?Sized>(value: &T) -> String {
    let mut buf = Vec::with_capacity(256);
    let mut ser = Serializer::with_formatter(&mut buf, SpacedFormatter);
    if let Err(e) = value.serialize(&mut ser) {
        // Records come from JSON, so this only fires on a broken writer.
        warn!(error = %e, "failed to encode page context");
        return String::new();
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(raw: &str) -> Vec<ContextRecord> {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn spaced_layout_and_order() {
        let recs = records(r#"[{"airline":"IndiGo","price":3000,"tags":["a","b"],"x":{}}]"#);
        assert_eq!(
            encode_record(&recs[0]),
            r#"{"airline": "IndiGo", "price": 3000, "tags": ["a", "b"], "x": {}}"#
        );
    }

    #[test]
    fn non_ascii_is_kept_verbatim() {
        let recs = records(r#"[{"price":"₹4,500","city":"Zürich"}]"#);
        assert_eq!(
            encode_record(&recs[0]),
            r#"{"price": "₹4,500", "city": "Zürich"}"#
        );
    }

    #[test]
    fn every_record_is_a_substring_of_the_collection() {
        let recs = records(
            r#"[
                {"airline": "Air India", "departure_time": "7:00 PM", "price": 5000.0},
                {"airline": "IndiGo", "segments": [{"dep_time": "06:00"}], "price": "₹3,000"},
                {"note": "quote \" and \\ slash"}
            ]"#,
        );
        let blob = encode_records(&recs);
        assert!(blob.starts_with('[') && blob.ends_with(']'));
        for r in &recs {
            assert!(blob.contains(&encode_record(r)));
        }
    }

    #[test]
    fn empty_collection() {
        assert_eq!(encode_records(&[]), "[]");
    }
}
