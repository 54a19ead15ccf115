//! Payload decoding: bulk CSV downloads and JSON shape checks.

use csv::{ReaderBuilder, StringRecord, Trim};
use serde_json::Value;
use tracing::warn;

use crate::errors::NseError;
use crate::models::{LotSizes, Record, SymbolDirectory};

/// Parse the equity list CSV into symbol -> company name.
///
/// The first row is a header. Rows with fewer than two fields or an empty
/// symbol are skipped.
///
/// # Errors
///
/// [`NseError::Parse`] on malformed CSV, [`NseError::EmptyResponse`] if no
/// row survives.
pub fn parse_symbol_directory(body: &str, url: &str) -> Result<SymbolDirectory, NseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(body.as_bytes());

    let mut directory = SymbolDirectory::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| NseError::parse("symbol directory CSV", e))?;
        match (record.get(0), record.get(1)) {
            (Some(code), Some(name)) if !code.is_empty() => {
                directory.insert(code.to_string(), name.to_string());
            }
            _ => warn!("Skipping symbol directory row {}: {:?}", line + 2, record),
        }
    }

    if directory.is_empty() {
        return Err(NseError::EmptyResponse {
            url: url.to_string(),
        });
    }
    Ok(directory)
}

/// Parse the derivatives market-lot CSV into symbol -> current-month lot.
///
/// Columns are underlying, symbol, current month, following months... Any
/// row mentioning `symbol` is a header or section title and is skipped, as
/// are rows without a lot for the current month.
///
/// # Errors
///
/// [`NseError::Parse`] on malformed CSV or a non-integer lot,
/// [`NseError::EmptyResponse`] if no row survives.
pub fn parse_lot_sizes(body: &str, url: &str) -> Result<LotSizes, NseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(body.as_bytes());

    let mut lots = LotSizes::new();
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| NseError::parse("lot size CSV", e))?;
        if is_lot_header(&record) {
            continue;
        }

        let (symbol, lot) = match (record.get(1), record.get(2)) {
            (Some(symbol), Some(lot)) if !symbol.is_empty() && !lot.is_empty() => (symbol, lot),
            _ => {
                warn!("Skipping lot size row {}: {:?}", line + 1, record);
                continue;
            }
        };

        let size = lot.parse::<i64>().map_err(|e| {
            NseError::parse(
                "lot size CSV",
                format!("row {}: lot `{}` for {}: {}", line + 1, lot, symbol, e),
            )
        })?;
        lots.insert(symbol.to_string(), size);
    }

    if lots.is_empty() {
        return Err(NseError::EmptyResponse {
            url: url.to_string(),
        });
    }
    Ok(lots)
}

fn is_lot_header(record: &StringRecord) -> bool {
    record
        .iter()
        .any(|field| field.to_lowercase().contains("symbol"))
}

/// Remove and return `field` from a JSON object.
pub(crate) fn take_field(value: Value, field: &str, context: &str) -> Result<Value, NseError> {
    match value {
        Value::Object(mut map) => map
            .remove(field)
            .ok_or_else(|| NseError::parse(context, format!("missing field `{}`", field))),
        other => Err(NseError::parse(
            context,
            format!("expected an object, got {}", type_name(&other)),
        )),
    }
}

/// Require a JSON object.
pub(crate) fn into_record(value: Value, context: &str) -> Result<Record, NseError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(NseError::parse(
            context,
            format!("expected an object, got {}", type_name(&other)),
        )),
    }
}

/// Require a JSON array of objects.
pub(crate) fn into_records(value: Value, context: &str) -> Result<Vec<Record>, NseError> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| into_record(item, context))
            .collect(),
        other => Err(NseError::parse(
            context,
            format!("expected an array, got {}", type_name(&other)),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
