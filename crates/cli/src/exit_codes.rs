//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; monitoring cron jobs key
//! their alerting off them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                                |
//! |---------|-----------|--------------------------------------------|
//! | 0       | Universal | Success                                    |
//! | 1       | Universal | General error (unspecified)                |
//! | 2       | Universal | CLI usage error (bad args, missing file)   |
//! | 3-9     | batch     | Audit batch outcomes                       |
//! | 10-19   | service   | Query service and certificate failures     |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - every requested collection audited cleanly.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unknown collection, missing file.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Batch (3-9)
// =============================================================================

/// Configuration failed to parse or validate.
pub const EXIT_CONFIG_INVALID: u8 = 3;

/// At least one collection failed; the batch continued past it and the
/// failures are listed on stderr.
pub const EXIT_AUDIT_PARTIAL: u8 = 4;

// =============================================================================
// Service (10-19)
// =============================================================================

/// Client certificate missing or unreadable.
pub const EXIT_CERT: u8 = 10;

/// A query was rejected or failed upstream.
pub const EXIT_QUERY: u8 = 11;

/// A query result's schema did not match what the audit needs.
pub const EXIT_SCHEMA: u8 = 12;

/// A report file could not be created or written.
pub const EXIT_REPORT_IO: u8 = 13;
