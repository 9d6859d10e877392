//! `caomwatch-recon`: pure reconciliation engine for archive metadata.
//!
//! Receives already-fetched tabular results, returns classified row sets
//! plus aggregate statistics. No network, file, or CLI surface; the caller
//! owns data acquisition and report writing.

pub mod classify;
pub mod duplicates;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;
pub mod partition;
pub mod summary;
pub mod timer;

pub use duplicates::{profile_duplicates, DupProfile, DupRow, DupSummary};
pub use engine::reconcile;
pub use error::{SchemaError, Side};
pub use model::{
    columns, Bucket, CompareField, FieldDiffs, MatchedRow, MissingRow, RawTable, ReconResult,
    Record, Table,
};
pub use normalize::normalize;
pub use summary::{ReconSummary, SetStats};
pub use timer::{PhaseDurations, PhaseTimer};
