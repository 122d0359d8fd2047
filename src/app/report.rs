//! Run summary.

use std::fmt;

use log::info;
use strum::IntoEnumIterator;

use crate::geoip::{GeoIpMetadata, Source};
use crate::pipeline::StreamReport;

use super::logging::records_per_second;

/// Results of an enrichment run.
#[derive(Debug, Clone)]
pub struct EnrichReport {
    /// Data records written (header excluded)
    pub records: usize,
    /// Data records for which at least one attribute resolved
    pub matched: usize,
    /// Data records with at least one city attribute
    pub city_matched: usize,
    /// Data records with at least one ASN attribute
    pub asn_matched: usize,
    /// Elapsed time in seconds, including database loading
    pub elapsed_seconds: f64,
    /// City database metadata
    pub city_db: GeoIpMetadata,
    /// ASN database metadata
    pub asn_db: GeoIpMetadata,
}

impl EnrichReport {
    pub(crate) fn new(
        stream: StreamReport,
        elapsed_seconds: f64,
        city_db: GeoIpMetadata,
        asn_db: GeoIpMetadata,
    ) -> Self {
        Self {
            records: stream.records,
            matched: stream.matched,
            city_matched: stream.city_matched,
            asn_matched: stream.asn_matched,
            elapsed_seconds,
            city_db,
            asn_db,
        }
    }

    /// Records with no resolved attribute.
    pub fn unmatched(&self) -> usize {
        self.records - self.matched
    }

    /// Records with at least one attribute from `source`.
    pub fn matched_from(&self, source: Source) -> usize {
        match source {
            Source::City => self.city_matched,
            Source::Asn => self.asn_matched,
        }
    }

    /// One line per database: how many records it resolved.
    pub fn source_breakdown(&self) -> Vec<String> {
        Source::iter()
            .map(|source| {
                let metadata = match source {
                    Source::City => &self.city_db,
                    Source::Asn => &self.asn_db,
                };
                format!(
                    "{} ({} {}): {} of {} records",
                    source.label(),
                    metadata.database_type,
                    metadata.version,
                    self.matched_from(source),
                    self.records
                )
            })
            .collect()
    }

    pub(crate) fn log_breakdown(&self) {
        for line in self.source_breakdown() {
            info!("{}", line);
        }
    }
}

impl fmt::Display for EnrichReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Enriched {} record{} ({} matched, {} unmatched) in {:.1}s (~{:.0} records/sec)",
            self.records,
            if self.records == 1 { "" } else { "s" },
            self.matched,
            self.unmatched(),
            self.elapsed_seconds,
            records_per_second(self.records, self.elapsed_seconds)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn metadata(db: &str) -> GeoIpMetadata {
        GeoIpMetadata {
            source: format!("{}.mmdb", db),
            database_type: db.to_string(),
            version: "build_0".to_string(),
            loaded_at: SystemTime::now(),
        }
    }

    #[test]
    fn test_report_summary_plural() {
        let report = EnrichReport::new(
            StreamReport {
                records: 10,
                matched: 7,
                city_matched: 6,
                asn_matched: 5,
            },
            2.0,
            metadata("GeoLite2-City"),
            metadata("GeoLite2-ASN"),
        );
        assert_eq!(report.unmatched(), 3);
        assert_eq!(
            report.to_string(),
            "Enriched 10 records (7 matched, 3 unmatched) in 2.0s (~5 records/sec)"
        );
    }

    #[test]
    fn test_report_summary_singular() {
        let report = EnrichReport::new(
            StreamReport {
                records: 1,
                ..StreamReport::default()
            },
            0.0,
            metadata("GeoLite2-City"),
            metadata("GeoLite2-ASN"),
        );
        assert!(report.to_string().starts_with("Enriched 1 record ("));
    }

    #[test]
    fn test_source_breakdown() {
        let report = EnrichReport::new(
            StreamReport {
                records: 10,
                matched: 7,
                city_matched: 6,
                asn_matched: 5,
            },
            1.0,
            metadata("GeoLite2-City"),
            metadata("GeoLite2-ASN"),
        );
        assert_eq!(report.matched_from(Source::City), 6);
        assert_eq!(
            report.source_breakdown(),
            vec![
                "City (GeoLite2-City build_0): 6 of 10 records",
                "ASN (GeoLite2-ASN build_0): 5 of 10 records",
            ]
        );
    }
}
