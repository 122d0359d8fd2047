//! Main application modules.
//!
//! This module provides progress logging and the run summary used by the
//! library entry point and the binary.

pub mod logging;
pub mod report;

// Re-export public API
pub use logging::log_progress;
pub use report::EnrichReport;
