//! Serde support for limit fields.
//!
//! The schema encodes limits inconsistently: plain numbers (`-1.0`), quoted
//! numbers (`"-1.0"`) and infinity sentinels (`"-inf"`, `"inf"`). All of them
//! normalise to a single `f64`, with `f64::NEG_INFINITY` / `f64::INFINITY`
//! standing for an unbounded side.
//!
//! Serialization is canonical: finite values are written as JSON numbers and
//! infinite values as `"-inf"` / `"inf"`. `serde_json` writes the shortest
//! representation that parses back to the same bits, so a write/read cycle
//! is lossless.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

/// Parse a textual limit.
pub fn parse_bound(text: &str) -> Result<f64, String> {
    let trimmed = text.trim();
    let value = match trimmed.to_ascii_lowercase().as_str() {
        "inf" | "+inf" | "infinity" | "+infinity" => f64::INFINITY,
        "-inf" | "-infinity" => f64::NEG_INFINITY,
        _ => trimmed
            .parse::<f64>()
            .map_err(|_| format!("'{text}' is neither a number nor an infinity sentinel"))?,
    };
    if value.is_nan() {
        return Err(format!("'{text}' is not a valid limit"));
    }
    Ok(value)
}

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if *value == f64::INFINITY {
        serializer.serialize_str("inf")
    } else if *value == f64::NEG_INFINITY {
        serializer.serialize_str("-inf")
    } else {
        serializer.serialize_f64(*value)
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Number(v) => Ok(v),
        Repr::Text(text) => parse_bound(&text).map_err(D::Error::custom),
    }
}
