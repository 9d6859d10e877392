use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::model::{Bucket, MatchedRow, Table};

/// Row count plus summed bytes for one row set. Sizes come from the
/// authoritative (left) side where available, the right side otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SetStats {
    pub rows: usize,
    pub bytes: i64,
}

/// Aggregate counts, byte sizes, and the engine's own compute duration.
/// Bucket keys are [`Bucket::as_str`] names; empty buckets are omitted.
#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub left: SetStats,
    pub right: SetStats,
    pub union_keys: usize,
    pub missing_in_right: SetStats,
    pub missing_in_left: SetStats,
    pub consistent: SetStats,
    pub inconsistent_rows: usize,
    pub buckets: BTreeMap<String, SetStats>,
    pub compare_duration: Duration,
}

pub(crate) fn compute_summary(
    left: &Table,
    right: &Table,
    missing_in_right: SetStats,
    missing_in_left: SetStats,
    matched: &[MatchedRow],
) -> ReconSummary {
    let mut buckets: BTreeMap<String, SetStats> = BTreeMap::new();
    let mut consistent = SetStats::default();
    let mut inconsistent_rows = 0;

    for m in matched {
        let bytes = m.left.content_length.or(m.right.content_length).unwrap_or(0);
        if m.bucket == Bucket::Consistent {
            consistent.rows += 1;
            consistent.bytes += bytes;
        } else {
            inconsistent_rows += 1;
            let entry = buckets.entry(m.bucket.as_str().to_string()).or_default();
            entry.rows += 1;
            entry.bytes += bytes;
        }
    }

    ReconSummary {
        left: SetStats {
            rows: left.len(),
            bytes: left.total_bytes(),
        },
        right: SetStats {
            rows: right.len(),
            bytes: right.total_bytes(),
        },
        union_keys: missing_in_right.rows + missing_in_left.rows + matched.len(),
        missing_in_right,
        missing_in_left,
        consistent,
        inconsistent_rows,
        buckets,
        compare_duration: Duration::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDiffs, Record};

    fn rec(uri: &str, length: Option<i64>) -> Record {
        Record {
            uri: Some(uri.into()),
            content_checksum: None,
            content_length: length,
            content_type: None,
            last_modified: None,
        }
    }

    fn matched(uri: &str, bucket: Bucket, length: Option<i64>) -> MatchedRow {
        MatchedRow {
            uri: uri.into(),
            bucket,
            diffs: FieldDiffs::default(),
            left: rec(uri, length),
            right: rec(uri, length),
        }
    }

    #[test]
    fn summary_counts_and_bytes() {
        let left = Table::from_records(vec![rec("a", Some(10)), rec("b", Some(20))]);
        let right = Table::from_records(vec![rec("a", Some(10))]);
        let rows = vec![
            matched("a", Bucket::Consistent, Some(10)),
            matched("b", Bucket::DiffLength, Some(20)),
        ];
        let s = compute_summary(
            &left,
            &right,
            SetStats { rows: 1, bytes: 7 },
            SetStats::default(),
            &rows,
        );
        assert_eq!(s.left.rows, 2);
        assert_eq!(s.left.bytes, 30);
        assert_eq!(s.right.rows, 1);
        assert_eq!(s.union_keys, 3);
        assert_eq!(s.consistent, SetStats { rows: 1, bytes: 10 });
        assert_eq!(s.inconsistent_rows, 1);
        assert_eq!(s.buckets["diff_length"], SetStats { rows: 1, bytes: 20 });
        assert_eq!(s.missing_in_right, SetStats { rows: 1, bytes: 7 });
    }
}
