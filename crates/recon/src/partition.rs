use std::collections::BTreeMap;

use crate::model::{MissingRow, Record, Table};

/// Key-set partition of two canonical tables: an antijoin each way plus
/// the inner join. Exactly one pair per shared key, guaranteed by the
/// Table uniqueness invariant.
#[derive(Debug, Default)]
pub struct KeyPartition {
    pub missing_in_right: Vec<MissingRow>,
    pub missing_in_left: Vec<MissingRow>,
    /// Summed bytes of the rows behind each antijoin, taken from the side
    /// that has them. The missing rows themselves keep only uri and
    /// timestamp.
    pub missing_bytes_right: i64,
    pub missing_bytes_left: i64,
    pub matched: Vec<(Record, Record)>,
}

/// Partition `keys(left) ∪ keys(right)`. Records with a null key cannot
/// match anything and fall into the missing set of the opposite side.
/// All output sets inherit the tables' key order.
pub fn partition_keys(left: &Table, right: &Table) -> KeyPartition {
    let left_by_key: BTreeMap<&str, &Record> = keyed(left);
    let right_by_key: BTreeMap<&str, &Record> = keyed(right);

    let mut out = KeyPartition::default();

    for rec in left.records() {
        match rec.uri.as_deref() {
            Some(uri) => match right_by_key.get(uri) {
                Some(other) => out.matched.push((rec.clone(), (*other).clone())),
                None => {
                    out.missing_bytes_right += rec.content_length.unwrap_or(0);
                    out.missing_in_right.push(missing_row(rec));
                }
            },
            None => {
                out.missing_bytes_right += rec.content_length.unwrap_or(0);
                out.missing_in_right.push(missing_row(rec));
            }
        }
    }

    for rec in right.records() {
        let unmatched = match rec.uri.as_deref() {
            Some(uri) => !left_by_key.contains_key(uri),
            None => true,
        };
        if unmatched {
            out.missing_bytes_left += rec.content_length.unwrap_or(0);
            out.missing_in_left.push(missing_row(rec));
        }
    }

    out
}

fn keyed(table: &Table) -> BTreeMap<&str, &Record> {
    table
        .records()
        .iter()
        .filter_map(|r| r.uri.as_deref().map(|u| (u, r)))
        .collect()
}

fn missing_row(rec: &Record) -> MissingRow {
    MissingRow {
        uri: rec.uri.clone(),
        last_modified: rec.last_modified.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(uri: Option<&str>, length: Option<i64>) -> Record {
        Record {
            uri: uri.map(String::from),
            content_checksum: None,
            content_length: length,
            content_type: None,
            last_modified: Some("2026-01-01T00:00:00".into()),
        }
    }

    #[test]
    fn antijoins_and_inner_join() {
        let left = Table::from_records(vec![
            rec(Some("ivo://x/a"), Some(10)),
            rec(Some("ivo://x/b"), Some(20)),
        ]);
        let right = Table::from_records(vec![
            rec(Some("ivo://x/a"), Some(10)),
            rec(Some("ivo://x/c"), Some(30)),
        ]);

        let part = partition_keys(&left, &right);
        assert_eq!(part.matched.len(), 1);
        assert_eq!(part.matched[0].0.uri.as_deref(), Some("ivo://x/a"));
        assert_eq!(part.missing_in_right.len(), 1);
        assert_eq!(part.missing_in_right[0].uri.as_deref(), Some("ivo://x/b"));
        assert_eq!(part.missing_bytes_right, 20);
        assert_eq!(part.missing_in_left.len(), 1);
        assert_eq!(part.missing_in_left[0].uri.as_deref(), Some("ivo://x/c"));
        assert_eq!(part.missing_bytes_left, 30);
    }

    #[test]
    fn null_keys_never_match() {
        let left = Table::from_records(vec![rec(None, Some(5))]);
        let right = Table::from_records(vec![rec(None, Some(7))]);

        let part = partition_keys(&left, &right);
        assert!(part.matched.is_empty());
        assert_eq!(part.missing_in_right.len(), 1);
        assert_eq!(part.missing_in_left.len(), 1);
    }

    #[test]
    fn output_preserves_key_order() {
        let left = Table::from_records(vec![
            rec(Some("ivo://x/a"), None),
            rec(Some("ivo://x/b"), None),
            rec(Some("ivo://x/c"), None),
        ]);
        let right = Table::from_records(vec![]);

        let part = partition_keys(&left, &right);
        let uris: Vec<_> = part
            .missing_in_right
            .iter()
            .map(|m| m.uri.clone().unwrap())
            .collect();
        assert_eq!(uris, vec!["ivo://x/a", "ivo://x/b", "ivo://x/c"]);
    }
}
