//! Error type definitions.
//!
//! This module defines the error types used throughout the application.

use std::path::PathBuf;

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// A GeoIP database could not be read from disk.
    #[error("Failed to read GeoIP database {}: {source}", path.display())]
    DatabaseReadError {
        /// Path of the database file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A GeoIP database file was read but is not a valid MaxMind DB.
    #[error("Failed to parse GeoIP database {}: {source}", path.display())]
    DatabaseParseError {
        /// Path of the database file
        path: PathBuf,
        /// Underlying maxminddb error
        source: maxminddb::MaxMindDbError,
    },

    /// The localization table file could not be loaded.
    #[error("Failed to load localization table {}: {reason}", path.display())]
    LocalizationTableError {
        /// Path of the table file
        path: PathBuf,
        /// What went wrong
        reason: String,
    },
}

/// Invalid configuration values.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The delimiter must be a single ASCII character.
    #[error("Invalid delimiter {0:?}: expected a single ASCII character (or \"tab\")")]
    InvalidDelimiter(String),

    /// At least one record must be allowed in flight.
    #[error("Concurrency must be at least 1")]
    ZeroConcurrency,
}

/// Error types raised while streaming records through the enrichment pipeline.
#[derive(Error, Debug)]
pub enum EnrichError {
    /// The configured IP column name does not appear in the header record.
    #[error("IP column {column:?} not found in header [{}]", header.join(", "))]
    MissingIpColumn {
        /// Configured column name
        column: String,
        /// Header record as read
        header: Vec<String>,
    },

    /// The input could not be parsed, or the output could not be serialized.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A pipeline worker terminated abnormally.
    #[error("Pipeline worker failed: {0}")]
    WorkerFailed(String),
}
