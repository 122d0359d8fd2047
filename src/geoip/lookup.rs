//! IP address lookup against GeoIP databases.
//!
//! [`GeoLookup`] is the seam between the enrichment code and the database:
//! given an IP string it returns the decoded record tree, or `None` when the
//! address is malformed or has no entry.

use std::collections::HashMap;
use std::net::IpAddr;

use maxminddb::Reader;
use serde_json::Value;

use super::metadata::GeoIpMetadata;

/// A read-only IP lookup source.
pub trait GeoLookup: Send + Sync {
    /// Looks up `ip`, returning the decoded record tree if there is one.
    fn lookup(&self, ip: &str) -> Option<Value>;
}

/// Lookup backed by a MaxMind DB file loaded into memory.
pub struct MmdbLookup {
    reader: Reader<Vec<u8>>,
    metadata: GeoIpMetadata,
}

impl MmdbLookup {
    pub(crate) fn new(reader: Reader<Vec<u8>>, metadata: GeoIpMetadata) -> Self {
        Self { reader, metadata }
    }

    /// Metadata of the loaded database.
    pub fn metadata(&self) -> &GeoIpMetadata {
        &self.metadata
    }
}

impl GeoLookup for MmdbLookup {
    fn lookup(&self, ip: &str) -> Option<Value> {
        let ip_addr = parse_ip(ip)?;

        // maxminddb 0.27 API: lookup() returns Result<LookupResult, MaxMindDbError>
        let result = match self.reader.lookup(ip_addr) {
            Ok(result) => result,
            Err(e) => {
                log::debug!("Lookup of {} in {} failed: {}", ip_addr, self.metadata.source, e);
                return None;
            }
        };

        if !result.has_data() {
            return None;
        }

        match result.decode::<Value>() {
            Ok(tree) => tree,
            Err(e) => {
                log::debug!("Failed to decode record for {}: {}", ip_addr, e);
                None
            }
        }
    }
}

/// Parses an IP field, ignoring surrounding whitespace.
///
/// Anything `IpAddr` rejects (ports, brackets, zone ids, host names) is `None`.
pub(crate) fn parse_ip(raw: &str) -> Option<IpAddr> {
    raw.trim().parse().ok()
}

/// In-memory lookup keyed by the exact IP string.
///
/// Useful for fixtures and for callers that already hold decoded records.
#[derive(Debug, Clone, Default)]
pub struct MapLookup {
    entries: HashMap<String, Value>,
}

impl MapLookup {
    /// Creates an empty lookup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the record for `ip`.
    pub fn insert(&mut self, ip: impl Into<String>, tree: Value) {
        self.entries.insert(ip.into(), tree);
    }

    /// Builder-style variant of [`MapLookup::insert`].
    pub fn with(mut self, ip: impl Into<String>, tree: Value) -> Self {
        self.insert(ip, tree);
        self
    }
}

impl GeoLookup for MapLookup {
    fn lookup(&self, ip: &str) -> Option<Value> {
        self.entries.get(ip.trim()).cloned()
    }
}
