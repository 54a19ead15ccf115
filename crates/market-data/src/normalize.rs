//! Numeric coercion for string-typed payload fields.
//!
//! The exchange sends most numbers as JSON strings (`"123.45"`, `"1000"`),
//! marks missing values with a dash and sometimes groups digits with commas.
//! [`NormalizePolicy`] rewrites the top-level values of a record in a fixed
//! order of attempts: integer, then float, then leave the string untouched.
//!
//! The baseline policy keeps `"-"` and `"1,000"` as strings. The cleaning
//! policy maps `"-"` to null and strips commas before parsing.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::models::Record;

/// The exchange's "no data" marker.
pub const NO_DATA_SENTINEL: &str = "-";

/// Which optional rewrites to apply on top of plain numeric parsing.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct NormalizePolicy {
    /// Map the `"-"` sentinel to `null`.
    pub dash_as_null: bool,
    /// Remove `,` digit separators before numeric parsing.
    pub strip_commas: bool,
}

impl NormalizePolicy {
    /// Plain integer/float coercion, nothing else.
    pub const fn baseline() -> Self {
        Self {
            dash_as_null: false,
            strip_commas: false,
        }
    }

    /// Baseline plus dash-to-null and comma stripping.
    pub const fn cleaning() -> Self {
        Self {
            dash_as_null: true,
            strip_commas: true,
        }
    }

    /// Return a new record with every string value coerced where possible.
    ///
    /// Non-string values (numbers, null, nested objects and arrays) are
    /// copied unchanged. The input is not modified.
    pub fn normalize(&self, record: &Record) -> Record {
        record
            .iter()
            .map(|(key, value)| (key.clone(), self.normalize_value(value)))
            .collect()
    }

    /// Coerce a single value.
    pub fn normalize_value(&self, value: &Value) -> Value {
        match value {
            Value::String(raw) => self.coerce(raw),
            other => other.clone(),
        }
    }

    fn coerce(&self, raw: &str) -> Value {
        if self.dash_as_null && raw.trim() == NO_DATA_SENTINEL {
            return Value::Null;
        }

        let candidate = if self.strip_commas && raw.contains(',') {
            raw.replace(',', "")
        } else {
            raw.to_string()
        };

        parse_integer(candidate.trim())
            .or_else(|| parse_float(candidate.trim()))
            .unwrap_or_else(|| Value::String(raw.to_string()))
    }
}

/// Normalize with the baseline policy.
pub fn normalize(record: &Record) -> Record {
    NormalizePolicy::baseline().normalize(record)
}

fn parse_integer(s: &str) -> Option<Value> {
    if let Ok(n) = s.parse::<i64>() {
        return Some(Value::Number(n.into()));
    }
    s.parse::<u64>().ok().map(|n| Value::Number(n.into()))
}

// Non-finite floats ("nan", "inf") have no JSON representation and stay strings.
fn parse_float(s: &str) -> Option<Value> {
    s.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}
