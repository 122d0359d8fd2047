//! Error handling.
//!
//! Errors are grouped by the phase in which they occur:
//! - **Initialization**: logger setup, database and localization table loading
//! - **Configuration**: invalid option values
//! - **Enrichment**: failures while streaming records (parse, I/O, missing IP column)
//!
//! Per-record lookup misses are not errors; they surface as empty attribute values.

mod types;

// Re-export public API
pub use types::{ConfigError, EnrichError, InitializationError};
