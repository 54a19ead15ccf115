//! JSON text rendering of query results.
//!
//! Every result type serializes with `serde`; these helpers cover the
//! "give me a JSON string instead" presentation choice.

use serde::Serialize;

use crate::errors::NseError;

/// Compact JSON text.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, NseError> {
    Ok(serde_json::to_string(value)?)
}

/// Indented JSON text.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, NseError> {
    Ok(serde_json::to_string_pretty(value)?)
}
