//! GeoIP lookup using MaxMind GeoLite2 databases.
//!
//! This module opens the city and ASN databases, reads a fixed set of
//! attributes out of their records, and optionally rewrites country and
//! region names through a localization table.

mod attributes;
mod extract;
mod init;
mod localize;
mod lookup;
mod metadata;
mod path;

// Re-export public API
pub use attributes::{render_value, AttributeProfile, GeoAttributes, GeoField, Source};
pub use extract::{attributes_from_trees, extract_attributes};
pub use init::{open_databases, GeoDatabases};
pub use localize::LocalizationTable;
pub use lookup::{GeoLookup, MapLookup, MmdbLookup};
pub use metadata::GeoIpMetadata;
pub use path::{read_path, PathSegment};
