//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources before any
//! record is read:
//! - Logger
//! - GeoIP databases
//! - Localization table

mod logger;

use std::sync::Arc;

use crate::config::{Config, LocalizationSource};
use crate::error_handling::InitializationError;
use crate::geoip::LocalizationTable;

// Re-export public API
pub use crate::geoip::{open_databases, GeoDatabases};
pub use logger::init_logger_with;

/// Loads the localization table named by the configuration, if any.
///
/// # Errors
///
/// Returns `InitializationError::LocalizationTableError` if the table cannot
/// be read or parsed.
pub async fn init_localization(
    config: &Config,
) -> Result<Option<Arc<LocalizationTable>>, InitializationError> {
    let table = match &config.localization {
        None => return Ok(None),
        Some(LocalizationSource::Korean) => LocalizationTable::korean()?,
        Some(LocalizationSource::File(path)) => LocalizationTable::from_file(path).await?,
    };
    Ok(Some(Arc::new(table)))
}
