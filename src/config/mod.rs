//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (defaults)
//! - CLI option types and parsing
//! - The library-level [`Config`]

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{parse_delimiter, Config, LocaleChoice, LocalizationSource, LogFormat, LogLevel, Opt};
