use crate::error::SchemaError;
use crate::model::{columns, RawTable, Record, Table};

/// Build a canonical [`Table`] from a raw query result.
///
/// Rows are stable-sorted ascending by `key_column`, consecutive equal keys
/// collapse to their first row (earliest in original input order), and
/// `contentLength` is coerced to a nullable 64-bit integer for every row,
/// even when the whole column is null. Rows with a null key are kept as
/// singletons: "no URI" never merges with another "no URI".
pub fn normalize(raw: &RawTable, key_column: &str) -> Result<Table, SchemaError> {
    let key_idx = require_column(raw, key_column)?;
    let checksum_idx = require_column(raw, columns::CONTENT_CHECKSUM)?;
    let length_idx = require_column(raw, columns::CONTENT_LENGTH)?;
    let type_idx = require_column(raw, columns::CONTENT_TYPE)?;
    let modified_idx = require_column(raw, columns::LAST_MODIFIED)?;

    let mut records = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        records.push(Record {
            uri: cell(row, key_idx),
            content_checksum: cell(row, checksum_idx),
            content_length: coerce_length(
                row.get(length_idx).map(String::as_str).unwrap_or(""),
                columns::CONTENT_LENGTH,
            )?,
            content_type: cell(row, type_idx),
            last_modified: cell(row, modified_idx),
        });
    }

    // Stable sort, so equal keys stay in input order and the retained row
    // of each duplicate group is the earliest one.
    records.sort_by(|a, b| a.uri.cmp(&b.uri));
    records.dedup_by(|cur, prev| prev.uri.is_some() && prev.uri == cur.uri);

    Ok(Table::from_records(records))
}

fn require_column(raw: &RawTable, name: &str) -> Result<usize, SchemaError> {
    raw.column_index(name).ok_or_else(|| SchemaError::MissingColumn {
        column: name.to_string(),
    })
}

fn cell(row: &[String], idx: usize) -> Option<String> {
    match row.get(idx) {
        Some(v) if !v.is_empty() => Some(v.clone()),
        _ => None,
    }
}

/// Coerce a content-length cell into the nullable 64-bit integer domain.
/// Accepts empty (null), plain integers, and integral float renderings
/// such as "10.0", which is what a float-degraded upstream column prints.
fn coerce_length(raw_cell: &str, column: &str) -> Result<Option<i64>, SchemaError> {
    let trimmed = raw_cell.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(Some(n));
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
            return Ok(Some(f as i64));
        }
    }
    Err(SchemaError::IntegerCoercion {
        column: column.to_string(),
        value: trimmed.to_string(),
    })
}
