use crate::model::{Bucket, CompareField, FieldDiffs, MatchedRow, Record};

/// Field-level comparison of one matched pair over the requested fields.
/// Null against null is equality; null against a value is a difference.
pub fn compare_fields(left: &Record, right: &Record, fields: &[CompareField]) -> FieldDiffs {
    let mut d = FieldDiffs::default();
    for field in fields {
        match field {
            CompareField::Checksum => {
                d.checksum = left.content_checksum != right.content_checksum;
            }
            CompareField::Length => {
                d.length = left.content_length != right.content_length;
            }
            CompareField::Type => {
                d.media_type = left.content_type != right.content_type;
            }
        }
    }
    d
}

/// Assign every matched pair to exactly one bucket of the 8-way partition.
pub fn classify_pairs(pairs: Vec<(Record, Record)>, fields: &[CompareField]) -> Vec<MatchedRow> {
    pairs
        .into_iter()
        .map(|(left, right)| {
            let diffs = compare_fields(&left, &right, fields);
            MatchedRow {
                uri: left.uri.clone().unwrap_or_default(),
                bucket: Bucket::from_diffs(diffs),
                diffs,
                left,
                right,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(checksum: Option<&str>, length: Option<i64>, media_type: Option<&str>) -> Record {
        Record {
            uri: Some("ivo://x/a".into()),
            content_checksum: checksum.map(String::from),
            content_length: length,
            content_type: media_type.map(String::from),
            last_modified: None,
        }
    }

    #[test]
    fn length_only_difference() {
        let left = rec(Some("c1"), Some(10), Some("t1"));
        let right = rec(Some("c1"), Some(99), Some("t1"));
        let rows = classify_pairs(vec![(left, right)], &CompareField::ALL);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].bucket, Bucket::DiffLength);
        assert!(rows[0].diffs.length);
        assert!(!rows[0].diffs.checksum);
    }

    #[test]
    fn checksum_and_length_difference() {
        let left = rec(Some("c1"), Some(10), Some("t1"));
        let right = rec(Some("c2"), Some(99), Some("t1"));
        let rows = classify_pairs(vec![(left, right)], &CompareField::ALL);
        assert_eq!(rows[0].bucket, Bucket::DiffChecksumLength);
    }

    #[test]
    fn null_against_null_is_equal() {
        let left = rec(None, None, None);
        let right = rec(None, None, None);
        let d = compare_fields(&left, &right, &CompareField::ALL);
        assert!(!d.any());
    }

    #[test]
    fn null_against_value_is_a_difference() {
        let left = rec(None, Some(10), Some("t1"));
        let right = rec(Some("c1"), Some(10), Some("t1"));
        let d = compare_fields(&left, &right, &CompareField::ALL);
        assert!(d.checksum);
        assert!(!d.length);
        assert!(!d.media_type);
    }

    #[test]
    fn unrequested_fields_never_differ() {
        let left = rec(Some("c1"), Some(10), Some("t1"));
        let right = rec(Some("c2"), Some(99), Some("t2"));
        let d = compare_fields(&left, &right, &[CompareField::Length]);
        assert!(!d.checksum);
        assert!(d.length);
        assert!(!d.media_type);
    }
}
