//! `caomwatch-tap`: blocking TAP/ADQL client for the archive services.
//!
//! Speaks the synchronous TAP protocol (form-encoded POST to `/sync`,
//! CSV response) with optional proxy-certificate auth, and owns the ADQL
//! text for the audit queries. Results come back as loosely typed
//! [`caomwatch_recon::RawTable`] values for the normalizer to validate.

pub mod adql;
pub mod client;
pub mod error;

pub use adql::{caom_artifact_query, caom_product_type_query, si_artifact_query, PRODUCT_TYPES};
pub use client::{parse_csv, TapClient};
pub use error::TapError;
