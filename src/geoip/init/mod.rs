//! GeoIP database opening.
//!
//! Both databases are opened concurrently. The first failure aborts startup,
//! so no record is processed unless both lookups are available.

mod loader;

use std::path::Path;

use crate::error_handling::InitializationError;
use crate::geoip::lookup::MmdbLookup;

use loader::load_from_file;

/// Opened city-level and ASN-level databases.
pub struct GeoDatabases {
    /// City-level lookup (GeoLite2-City)
    pub city: MmdbLookup,
    /// Network ownership lookup (GeoLite2-ASN)
    pub asn: MmdbLookup,
}

/// Opens the city and ASN databases.
///
/// # Errors
///
/// Returns the first [`InitializationError`] encountered: a file that cannot
/// be read or does not parse as a MaxMind DB.
pub async fn open_databases(
    city_path: &Path,
    asn_path: &Path,
) -> Result<GeoDatabases, InitializationError> {
    let (city, asn) =
        futures::future::try_join(load_from_file(city_path), load_from_file(asn_path)).await?;
    Ok(GeoDatabases { city, asn })
}
