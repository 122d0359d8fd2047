//! Metadata about loaded GeoIP databases.

use std::time::SystemTime;

use chrono::{DateTime, Utc};
use maxminddb::Reader;
use serde::Serialize;

/// Metadata about a loaded GeoIP database
#[derive(Debug, Clone, Serialize)]
pub struct GeoIpMetadata {
    /// Source path
    pub source: String,
    /// Database type as recorded in the file (e.g. `GeoLite2-City`)
    pub database_type: String,
    /// Database build version, derived from the build epoch
    pub version: String,
    /// When the database was loaded
    pub loaded_at: SystemTime,
}

impl GeoIpMetadata {
    /// Build date as an ISO-8601 day, when the build epoch is representable.
    pub fn build_date(&self) -> Option<String> {
        let epoch = self.version.strip_prefix("build_")?.parse::<i64>().ok()?;
        DateTime::<Utc>::from_timestamp(epoch, 0).map(|dt| dt.format("%Y-%m-%d").to_string())
    }
}

/// Extracts metadata from a GeoIP database
pub(crate) fn extract_metadata<T: AsRef<[u8]>>(reader: &Reader<T>, source: &str) -> GeoIpMetadata {
    // MaxMind databases have a build_epoch field in their metadata
    GeoIpMetadata {
        source: source.to_string(),
        database_type: reader.metadata.database_type.clone(),
        version: format!("build_{}", reader.metadata.build_epoch),
        loaded_at: SystemTime::now(),
    }
}
