//! GeoIP database loading from files.

use std::path::Path;

use maxminddb::Reader;

use crate::error_handling::InitializationError;
use crate::geoip::lookup::MmdbLookup;
use crate::geoip::metadata::extract_metadata;

/// Loads a GeoIP database from a local file path into memory.
pub(crate) async fn load_from_file(path: &Path) -> Result<MmdbLookup, InitializationError> {
    log::info!("Loading GeoIP database from: {}", path.display());

    let db_bytes =
        tokio::fs::read(path)
            .await
            .map_err(|source| InitializationError::DatabaseReadError {
                path: path.to_path_buf(),
                source,
            })?;

    let reader =
        Reader::from_source(db_bytes).map_err(|source| InitializationError::DatabaseParseError {
            path: path.to_path_buf(),
            source,
        })?;

    let metadata = extract_metadata(&reader, &path.display().to_string());
    log::info!(
        "Loaded {} ({}, built {})",
        metadata.source,
        metadata.database_type,
        metadata
            .build_date()
            .unwrap_or_else(|| metadata.version.clone())
    );

    Ok(MmdbLookup::new(reader, metadata))
}
