//! Configuration constants.
//!
//! Defaults for command-line options and limits used by the pipeline.

/// Default path of the city-level database.
pub const DEFAULT_CITY_DB: &str = "GeoLite2-City.mmdb";

/// Default path of the ASN database.
pub const DEFAULT_ASN_DB: &str = "GeoLite2-ASN.mmdb";

/// Default header name of the IP column.
pub const DEFAULT_IP_COLUMN: &str = "client_ip";

/// Default field delimiter.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Records enriched concurrently (and buffered for reordering) at most.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Data records between progress log lines.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100_000;

/// Path argument meaning standard input or standard output.
pub const STDIO_PATH: &str = "-";
