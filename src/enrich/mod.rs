//! Record enrichment.
//!
//! Turns parsed records into records with GeoIP columns appended: the header
//! gets the attribute names, data records get the attribute values.

mod record;
mod stage;

// Re-export public API
pub use record::{normalize_nulls, Record, NULL_SENTINEL};
pub use stage::{DataEnricher, EnrichStage, EnrichedRecord, Enricher, StageState};
