//! `caomwatch-report`: renders audit results to their delimited text
//! layouts. The writer knows nothing about where the tables came from;
//! side labels arrive as parameters and all I/O goes through the caller's
//! `io::Write`.

pub mod diff;
pub mod dup;
mod duration;

pub use diff::{write_diff_report, DiffReportContext};
pub use dup::{write_dup_report, DupReportContext};
pub use duration::format_duration;
