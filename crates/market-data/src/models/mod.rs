//! Result types returned by the product queries.
//!
//! - [`Record`] - one normalized JSON object (quote, index row, gainer, ...)
//! - [`SymbolDirectory`] - symbol code to company name
//! - [`LotSizes`] - derivatives symbol to contract lot size
//! - [`Movers`] - gainers/losers payload, whole or for one category

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// A flat field-to-value mapping after normalization.
///
/// Values are integers, floats, strings or null; nested objects are kept
/// as delivered by the exchange.
pub type Record = Map<String, Value>;

/// Symbol code to company name, ordered by code.
pub type SymbolDirectory = BTreeMap<String, String>;

/// Derivatives symbol to current-month lot size, ordered by symbol.
pub type LotSizes = BTreeMap<String, i64>;

/// Top gainers or losers.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Movers {
    /// The complete payload keyed by category (`NIFTY`, `BANKNIFTY`, ...).
    All(Record),
    /// The `data` rows of a single category.
    Category(Vec<Record>),
}

impl Movers {
    /// The per-category rows, if a category was selected.
    pub fn rows(&self) -> Option<&[Record]> {
        match self {
            Self::All(_) => None,
            Self::Category(rows) => Some(rows),
        }
    }
}
