use std::time::Instant;

use crate::classify::classify_pairs;
use crate::error::{SchemaError, Side};
use crate::model::{CompareField, ReconResult, Table};
use crate::partition::{partition_keys, KeyPartition};
use crate::summary::{compute_summary, SetStats};

/// Reconcile two canonical tables over the given comparison fields.
///
/// Stateless per call and pure over its inputs. Both tables must satisfy
/// the canonical invariants; a table that skipped the normalizer is
/// rejected here rather than silently miscompared. Emitted row sets are
/// sorted by key regardless of internal evaluation order, so reports diff
/// cleanly run to run.
pub fn reconcile(
    left: &Table,
    right: &Table,
    fields: &[CompareField],
) -> Result<ReconResult, SchemaError> {
    left.validate().map_err(|detail| SchemaError::NotCanonical {
        side: Side::Left,
        detail,
    })?;
    right.validate().map_err(|detail| SchemaError::NotCanonical {
        side: Side::Right,
        detail,
    })?;

    let started = Instant::now();

    let KeyPartition {
        missing_in_right,
        missing_in_left,
        missing_bytes_right,
        missing_bytes_left,
        matched,
    } = partition_keys(left, right);

    let matched = classify_pairs(matched, fields);

    let mut summary = compute_summary(
        left,
        right,
        SetStats {
            rows: missing_in_right.len(),
            bytes: missing_bytes_right,
        },
        SetStats {
            rows: missing_in_left.len(),
            bytes: missing_bytes_left,
        },
        &matched,
    );
    summary.compare_duration = started.elapsed();

    Ok(ReconResult {
        missing_in_right,
        missing_in_left,
        matched,
        summary,
    })
}
