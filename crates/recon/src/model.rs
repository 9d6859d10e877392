use serde::Serialize;

use crate::error::SchemaError;

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// Column names shared by both query sources.
pub mod columns {
    pub const URI: &str = "uri";
    pub const CONTENT_CHECKSUM: &str = "contentChecksum";
    pub const CONTENT_LENGTH: &str = "contentLength";
    pub const CONTENT_TYPE: &str = "contentType";
    pub const LAST_MODIFIED: &str = "lastModified";
}

/// A loosely typed tabular result as it arrives from a query source.
///
/// Cells are strings and the empty string is a null. Validation happens
/// once, in [`crate::normalize`], never ad hoc downstream.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Index of a named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Concatenate another result onto this one. The first appended result
    /// fixes the column layout; later ones must match it exactly.
    pub fn append(&mut self, mut other: RawTable) -> Result<(), SchemaError> {
        if self.columns.is_empty() && self.rows.is_empty() {
            *self = other;
            return Ok(());
        }
        if other.columns != self.columns {
            return Err(SchemaError::ColumnMismatch {
                expected: self.columns.clone(),
                found: other.columns,
            });
        }
        self.rows.append(&mut other.rows);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Canonical records
// ---------------------------------------------------------------------------

/// One artifact entry after normalization. `last_modified` is display-only
/// and never participates in comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub uri: Option<String>,
    pub content_checksum: Option<String>,
    pub content_length: Option<i64>,
    pub content_type: Option<String>,
    pub last_modified: Option<String>,
}

/// A canonical table: unique by non-null `uri`, sorted ascending by `uri`
/// (null keys first), `content_length` uniformly integer-typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    /// Wrap records without re-checking the invariants. The engine calls
    /// [`Table::validate`] before trusting the contents.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total bytes across non-null lengths.
    pub fn total_bytes(&self) -> i64 {
        self.records.iter().filter_map(|r| r.content_length).sum()
    }

    /// Re-check the sort and uniqueness invariants.
    pub fn validate(&self) -> Result<(), String> {
        for pair in self.records.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.uri > b.uri {
                return Err(format!("rows out of order at uri {:?}", b.uri));
            }
            if a.uri.is_some() && a.uri == b.uri {
                return Err(format!("duplicate key {:?}", a.uri));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Attributes the engine may compare between the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareField {
    Checksum,
    Length,
    Type,
}

impl CompareField {
    /// All three comparable attributes, the default comparison set.
    pub const ALL: [CompareField; 3] = [Self::Checksum, Self::Length, Self::Type];
}

/// Per-field disagreement of one matched pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldDiffs {
    pub checksum: bool,
    pub length: bool,
    pub media_type: bool,
}

impl FieldDiffs {
    pub fn any(&self) -> bool {
        self.checksum || self.length || self.media_type
    }
}

/// One cell of the 8-way matched-pair partition, indexed by the
/// (checksum, length, type) diff triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Consistent,
    DiffChecksum,
    DiffLength,
    DiffType,
    DiffChecksumLength,
    DiffChecksumType,
    DiffLengthType,
    DiffChecksumLengthType,
}

impl Bucket {
    /// The seven inconsistent cells, in reporting order.
    pub const INCONSISTENT: [Bucket; 7] = [
        Self::DiffChecksum,
        Self::DiffLength,
        Self::DiffType,
        Self::DiffChecksumLength,
        Self::DiffChecksumType,
        Self::DiffLengthType,
        Self::DiffChecksumLengthType,
    ];

    pub fn from_diffs(d: FieldDiffs) -> Bucket {
        match (d.checksum, d.length, d.media_type) {
            (false, false, false) => Self::Consistent,
            (true, false, false) => Self::DiffChecksum,
            (false, true, false) => Self::DiffLength,
            (false, false, true) => Self::DiffType,
            (true, true, false) => Self::DiffChecksumLength,
            (true, false, true) => Self::DiffChecksumType,
            (false, true, true) => Self::DiffLengthType,
            (true, true, true) => Self::DiffChecksumLengthType,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consistent => "consistent",
            Self::DiffChecksum => "diff_checksum",
            Self::DiffLength => "diff_length",
            Self::DiffType => "diff_type",
            Self::DiffChecksumLength => "diff_checksum_length",
            Self::DiffChecksumType => "diff_checksum_type",
            Self::DiffLengthType => "diff_length_type",
            Self::DiffChecksumLengthType => "diff_checksum_length_type",
        }
    }

    pub fn is_inconsistent(&self) -> bool {
        !matches!(self, Self::Consistent)
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A key present on one side only. Carries the display timestamp from the
/// side that has it.
#[derive(Debug, Clone, Serialize)]
pub struct MissingRow {
    pub uri: Option<String>,
    pub last_modified: Option<String>,
}

/// A key present on both sides, with both sides' attribute values and the
/// bucket its diff triple lands it in.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedRow {
    pub uri: String,
    pub bucket: Bucket,
    pub diffs: FieldDiffs,
    pub left: Record,
    pub right: Record,
}

/// Output of one reconciliation run. Row sets are sorted by `uri` and
/// disjoint; every key of either input appears in exactly one of them.
#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub missing_in_right: Vec<MissingRow>,
    pub missing_in_left: Vec<MissingRow>,
    pub matched: Vec<MatchedRow>,
    pub summary: crate::summary::ReconSummary,
}

impl ReconResult {
    /// Rows of one matched-pair bucket, in key order.
    pub fn rows_in(&self, bucket: Bucket) -> impl Iterator<Item = &MatchedRow> {
        self.matched.iter().filter(move |m| m.bucket == bucket)
    }

    /// Coarse roll-up: matched pairs disagreeing on at least one field.
    pub fn inconsistent(&self) -> impl Iterator<Item = &MatchedRow> {
        self.matched.iter().filter(|m| m.bucket.is_inconsistent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_from_diffs_covers_all_triples() {
        let triples = [
            (false, false, false, Bucket::Consistent),
            (true, false, false, Bucket::DiffChecksum),
            (false, true, false, Bucket::DiffLength),
            (false, false, true, Bucket::DiffType),
            (true, true, false, Bucket::DiffChecksumLength),
            (true, false, true, Bucket::DiffChecksumType),
            (false, true, true, Bucket::DiffLengthType),
            (true, true, true, Bucket::DiffChecksumLengthType),
        ];
        for (checksum, length, media_type, expected) in triples {
            let diffs = FieldDiffs { checksum, length, media_type };
            assert_eq!(Bucket::from_diffs(diffs), expected);
            assert_eq!(diffs.any(), expected.is_inconsistent());
        }
    }

    #[test]
    fn append_rejects_layout_mismatch() {
        let mut a = RawTable::new(["uri", "contentChecksum"]);
        a.push_row(["ivo://x/a", "md5:1"]);
        let b = RawTable::new(["uri", "contentLength"]);
        let err = a.append(b).unwrap_err();
        assert!(err.to_string().contains("column layout mismatch"));
    }

    #[test]
    fn append_into_empty_adopts_layout() {
        let mut a = RawTable::default();
        let mut b = RawTable::new(["uri"]);
        b.push_row(["ivo://x/a"]);
        a.append(b).unwrap();
        assert_eq!(a.columns, vec!["uri"]);
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn validate_rejects_unsorted_and_duplicate() {
        let rec = |uri: &str| Record {
            uri: Some(uri.into()),
            content_checksum: None,
            content_length: None,
            content_type: None,
            last_modified: None,
        };
        let unsorted = Table::from_records(vec![rec("b"), rec("a")]);
        assert!(unsorted.validate().is_err());

        let duplicated = Table::from_records(vec![rec("a"), rec("a")]);
        assert!(duplicated.validate().is_err());

        let ok = Table::from_records(vec![rec("a"), rec("b")]);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn validate_allows_repeated_null_keys() {
        let null_rec = Record {
            uri: None,
            content_checksum: None,
            content_length: None,
            content_type: None,
            last_modified: None,
        };
        let t = Table::from_records(vec![null_rec.clone(), null_rec]);
        assert!(t.validate().is_ok());
    }
}
