//! Deterministic flight-card answering with excerpt verification.
//!
//! Public API: [`interpret`] answers a question from page records, and
//! [`verify`] checks that an excerpt is quoted from the encoded page context
//! ([`encode_records`]). Nothing here performs I/O.

mod answer;
mod encode;
mod query;
mod ranker;
mod record;
mod time_parse;
mod verifier;

pub use answer::{ChatAnswer, FALLBACK_ANSWER};
pub use encode::{encode_record, encode_records};
pub use query::{KNOWN_AIRLINES, ParsedFilter};
pub use ranker::interpret;
pub use record::{ContextRecord, parse_price};
pub use time_parse::parse_time_to_minutes;
pub use verifier::{Verification, check, normalize, verify};
