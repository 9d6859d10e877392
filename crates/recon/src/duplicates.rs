//! Cross-type duplicate detection over artifact product-type profiles.
//!
//! Input rows carry a key column plus one indicator column per product
//! type (non-empty, non-zero cell = that type is present). Rows sharing a
//! key are merged with a per-column logical OR; a key registered under
//! more than one product type is a cross-type duplicate.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::SchemaError;
use crate::model::RawTable;

/// One URI's merged product-type profile.
#[derive(Debug, Clone, Serialize)]
pub struct DupRow {
    pub uri: Option<String>,
    /// One flag per indicator column, in [`DupProfile::flag_columns`] order.
    pub flags: Vec<bool>,
    /// Number of distinct product types set for this URI.
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DupSummary {
    pub total_uris: usize,
    /// Sum of per-URI counts, i.e. total product-type registrations.
    pub total_instances: usize,
    pub single_instance: usize,
    pub duplicates: usize,
    /// Registrations belonging to duplicate URIs.
    pub duplicate_instances: usize,
}

/// Product-type profile of a collection: one row per distinct URI, sorted
/// ascending by URI (null keys first).
#[derive(Debug, Clone, Serialize)]
pub struct DupProfile {
    pub flag_columns: Vec<String>,
    pub rows: Vec<DupRow>,
    pub summary: DupSummary,
}

impl DupProfile {
    /// Rows registered under more than one product type, in key order.
    pub fn duplicates(&self) -> impl Iterator<Item = &DupRow> {
        self.rows.iter().filter(|r| r.count > 1)
    }
}

/// Group raw rows by `key_column`, OR-merging every other column as a
/// product-type indicator. Rows with a null key are never merged; each
/// stays its own singleton.
pub fn profile_duplicates(raw: &RawTable, key_column: &str) -> Result<DupProfile, SchemaError> {
    let key_idx = raw
        .column_index(key_column)
        .ok_or_else(|| SchemaError::MissingColumn {
            column: key_column.to_string(),
        })?;

    let flag_indices: Vec<usize> = (0..raw.columns.len()).filter(|&i| i != key_idx).collect();
    let flag_columns: Vec<String> = flag_indices
        .iter()
        .map(|&i| raw.columns[i].clone())
        .collect();

    let mut by_key: BTreeMap<&str, Vec<bool>> = BTreeMap::new();
    let mut null_rows: Vec<Vec<bool>> = Vec::new();

    for row in &raw.rows {
        let flags: Vec<bool> = flag_indices
            .iter()
            .map(|&i| cell_is_set(row.get(i).map(String::as_str).unwrap_or("")))
            .collect();
        match row.get(key_idx).map(String::as_str).filter(|s| !s.is_empty()) {
            Some(key) => match by_key.get_mut(key) {
                Some(merged) => {
                    for (m, f) in merged.iter_mut().zip(&flags) {
                        *m = *m || *f;
                    }
                }
                None => {
                    by_key.insert(key, flags);
                }
            },
            None => null_rows.push(flags),
        }
    }

    let mut rows = Vec::with_capacity(null_rows.len() + by_key.len());
    for flags in null_rows {
        rows.push(dup_row(None, flags));
    }
    for (key, flags) in by_key {
        rows.push(dup_row(Some(key.to_string()), flags));
    }

    let mut summary = DupSummary {
        total_uris: rows.len(),
        ..DupSummary::default()
    };
    for row in &rows {
        summary.total_instances += row.count;
        if row.count > 1 {
            summary.duplicates += 1;
            summary.duplicate_instances += row.count;
        } else {
            summary.single_instance += 1;
        }
    }

    Ok(DupProfile {
        flag_columns,
        rows,
        summary,
    })
}

fn dup_row(uri: Option<String>, flags: Vec<bool>) -> DupRow {
    let count = flags.iter().filter(|f| **f).count();
    DupRow { uri, flags, count }
}

fn cell_is_set(cell: &str) -> bool {
    let trimmed = cell.trim();
    !(trimmed.is_empty() || trimmed == "0")
}
