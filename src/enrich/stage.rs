//! The record enrichment stage.
//!
//! The stage starts in [`StageState::AwaitingHeader`]. The first record is
//! the header: the IP column is located by name, the profile's column names
//! are appended, and the stage moves to [`StageState::Streaming`]. Every
//! later record gets the attribute values for the IP at that column.

use std::sync::Arc;

use crate::error_handling::EnrichError;
use crate::geoip::{
    extract_attributes, AttributeProfile, GeoAttributes, GeoLookup, LocalizationTable, Source,
};

use super::record::{normalize_nulls, Record};

/// Shared, read-only lookup configuration used for every data record.
pub struct Enricher {
    city: Arc<dyn GeoLookup>,
    asn: Arc<dyn GeoLookup>,
    profile: AttributeProfile,
    localization: Option<Arc<LocalizationTable>>,
}

impl Enricher {
    /// Creates an enricher without localization.
    pub fn new(city: Arc<dyn GeoLookup>, asn: Arc<dyn GeoLookup>, profile: AttributeProfile) -> Self {
        Self {
            city,
            asn,
            profile,
            localization: None,
        }
    }

    /// Enables the localization rewrite step.
    pub fn with_localization(mut self, table: Arc<LocalizationTable>) -> Self {
        self.localization = Some(table);
        self
    }

    /// Attribute profile appended by this enricher.
    pub fn profile(&self) -> AttributeProfile {
        self.profile
    }

    /// Attributes for one IP value, localized when a table is configured.
    pub fn attributes_for(&self, ip: Option<&str>) -> GeoAttributes {
        let attrs = extract_attributes(ip, self.city.as_ref(), self.asn.as_ref(), self.profile);
        match &self.localization {
            Some(table) => table.localize(attrs),
            None => attrs,
        }
    }
}

/// Where the stage is in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    /// No record seen yet; the next one is the header.
    AwaitingHeader,
    /// Header processed; the IP lives at `ip_column` in every data record.
    Streaming {
        /// Zero-based index of the IP column
        ip_column: usize,
    },
}

/// A record with appended attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    /// Original fields followed by the appended ones
    pub fields: Record,
    /// Whether any attribute was resolved (always `false` for the header)
    pub matched: bool,
    /// Whether a city attribute was resolved
    pub city_matched: bool,
    /// Whether an ASN attribute was resolved
    pub asn_matched: bool,
}

impl EnrichedRecord {
    fn header(fields: Record) -> Self {
        Self {
            fields,
            matched: false,
            city_matched: false,
            asn_matched: false,
        }
    }

    /// Whether an attribute from `source` was resolved.
    pub fn matched_from(&self, source: Source) -> bool {
        match source {
            Source::City => self.city_matched,
            Source::Asn => self.asn_matched,
        }
    }
}

/// Enriches data records once the IP column is known.
///
/// Cheap to clone and safe to share across worker threads.
#[derive(Clone)]
pub struct DataEnricher {
    enricher: Arc<Enricher>,
    ip_column: usize,
}

impl DataEnricher {
    /// Appends attribute values to a normalized data record.
    pub fn enrich(&self, mut record: Record) -> EnrichedRecord {
        let ip = record.get(self.ip_column).and_then(|field| field.as_deref());
        let attrs = self.enricher.attributes_for(ip);
        let city_matched = attrs.has_data_from(Source::City);
        let asn_matched = attrs.has_data_from(Source::Asn);
        record.extend(attrs.into_values());
        EnrichedRecord {
            fields: record,
            matched: city_matched || asn_matched,
            city_matched,
            asn_matched,
        }
    }

    /// Normalizes raw fields, then enriches them.
    pub fn enrich_raw<I, S>(&self, fields: I) -> EnrichedRecord
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enrich(normalize_nulls(fields))
    }

    /// Index of the IP column.
    pub fn ip_column(&self) -> usize {
        self.ip_column
    }
}

/// Two-state enrichment stage: header first, then data records.
pub struct EnrichStage {
    enricher: Arc<Enricher>,
    ip_column_name: String,
    state: StageState,
}

impl EnrichStage {
    /// Creates a stage awaiting its header record.
    pub fn new(enricher: Arc<Enricher>, ip_column_name: impl Into<String>) -> Self {
        Self {
            enricher,
            ip_column_name: ip_column_name.into(),
            state: StageState::AwaitingHeader,
        }
    }

    /// Current state.
    pub fn state(&self) -> StageState {
        self.state
    }

    /// Processes the next record in stream order.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::MissingIpColumn`] when the header does not name
    /// the configured IP column.
    pub fn process(&mut self, record: Record) -> Result<EnrichedRecord, EnrichError> {
        match self.state {
            StageState::AwaitingHeader => self.process_header(record),
            StageState::Streaming { ip_column } => Ok(DataEnricher {
                enricher: Arc::clone(&self.enricher),
                ip_column,
            }
            .enrich(record)),
        }
    }

    /// Handle for enriching data records off the stage, available once the
    /// header has been processed.
    pub fn data_enricher(&self) -> Option<DataEnricher> {
        match self.state {
            StageState::AwaitingHeader => None,
            StageState::Streaming { ip_column } => Some(DataEnricher {
                enricher: Arc::clone(&self.enricher),
                ip_column,
            }),
        }
    }

    fn process_header(&mut self, mut record: Record) -> Result<EnrichedRecord, EnrichError> {
        let ip_column = record
            .iter()
            .position(|name| name.as_deref() == Some(self.ip_column_name.as_str()))
            .ok_or_else(|| EnrichError::MissingIpColumn {
                column: self.ip_column_name.clone(),
                header: record
                    .iter()
                    .map(|name| name.clone().unwrap_or_default())
                    .collect(),
            })?;

        log::info!(
            "IP column {:?} found at index {}",
            self.ip_column_name,
            ip_column
        );

        record.extend(
            self.enricher
                .profile()
                .header_names()
                .map(|name| Some(name.to_string())),
        );
        self.state = StageState::Streaming { ip_column };

        Ok(EnrichedRecord::header(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geoip::MapLookup;
    use serde_json::json;

    fn enricher(profile: AttributeProfile) -> Arc<Enricher> {
        let city = MapLookup::new().with(
            "8.8.8.8",
            json!({ "country": { "iso_code": "US", "names": { "en": "United States" } } }),
        );
        let asn = MapLookup::new().with(
            "8.8.8.8",
            json!({ "autonomous_system_number": 15169, "autonomous_system_organization": "GOOGLE" }),
        );
        Arc::new(Enricher::new(Arc::new(city), Arc::new(asn), profile))
    }

    fn text(fields: &[Option<String>]) -> Vec<String> {
        fields.iter().map(|f| f.clone().unwrap_or_default()).collect()
    }

    #[test]
    fn test_header_appends_profile_names() {
        let mut stage = EnrichStage::new(enricher(AttributeProfile::Basic), "client_ip");
        assert_eq!(stage.state(), StageState::AwaitingHeader);

        let header = stage.process(normalize_nulls(["id", "client_ip"])).unwrap();
        assert_eq!(stage.state(), StageState::Streaming { ip_column: 1 });
        assert!(!header.matched);
        assert_eq!(header.fields.len(), 12);
        assert_eq!(
            text(&header.fields[..4]),
            vec!["id", "client_ip", "countryCode", "countryName"]
        );
        assert_eq!(
            header.fields.last().cloned().flatten().as_deref(),
            Some("autonomousSystemOrganization")
        );
    }

    #[test]
    fn test_data_row_appends_values() {
        let mut stage = EnrichStage::new(enricher(AttributeProfile::Basic), "client_ip");
        stage.process(normalize_nulls(["id", "client_ip"])).unwrap();

        let row = stage.process(normalize_nulls(["1", "8.8.8.8"])).unwrap();
        assert!(row.matched);
        let fields = text(&row.fields);
        assert_eq!(&fields[..4], &["1", "8.8.8.8", "US", "United States"]);
        assert_eq!(&fields[10..], &["15169", "GOOGLE"]);
    }

    #[test]
    fn test_matches_tracked_per_source() {
        let asn_only = Arc::new(Enricher::new(
            Arc::new(MapLookup::new()),
            Arc::new(MapLookup::new().with("1.1.1.1", json!({ "autonomous_system_number": 13335 }))),
            AttributeProfile::Basic,
        ));
        let mut stage = EnrichStage::new(asn_only, "client_ip");
        let header = stage.process(normalize_nulls(["client_ip"])).unwrap();
        assert!(!header.matched_from(Source::City) && !header.matched_from(Source::Asn));

        let row = stage.process(normalize_nulls(["1.1.1.1"])).unwrap();
        assert!(row.matched);
        assert!(row.matched_from(Source::Asn));
        assert!(!row.matched_from(Source::City));
    }

    #[test]
    fn test_row_width_matches_header_width() {
        for profile in [AttributeProfile::Basic, AttributeProfile::Extended] {
            let mut stage = EnrichStage::new(enricher(profile), "ip");
            let header = stage.process(normalize_nulls(["ip", "note"])).unwrap();
            for ip in ["8.8.8.8", "192.168.0.1", "NULL", "garbage"] {
                let row = stage.process(normalize_nulls([ip, "x"])).unwrap();
                assert_eq!(row.fields.len(), header.fields.len());
                assert_eq!(row.fields.len(), 2 + profile.width());
            }
        }
    }

    #[test]
    fn test_unknown_ip_appends_absent_values() {
        let mut stage = EnrichStage::new(enricher(AttributeProfile::Basic), "client_ip");
        stage.process(normalize_nulls(["client_ip"])).unwrap();

        let row = stage.process(normalize_nulls(["10.1.2.3"])).unwrap();
        assert!(!row.matched);
        assert!(row.fields[1..].iter().all(Option::is_none));
    }

    #[test]
    fn test_null_ip_is_absent() {
        let mut stage = EnrichStage::new(enricher(AttributeProfile::Basic), "client_ip");
        stage.process(normalize_nulls(["client_ip", "note"])).unwrap();

        let row = stage.process(normalize_nulls(["NULL", "NULL"])).unwrap();
        assert_eq!(row.fields[0], None);
        assert_eq!(row.fields[1], None);
        assert!(!row.matched);
    }

    #[test]
    fn test_missing_ip_column_fails() {
        let mut stage = EnrichStage::new(enricher(AttributeProfile::Basic), "client_ip");
        let err = stage.process(normalize_nulls(["id", "ip"])).unwrap_err();
        assert!(matches!(err, EnrichError::MissingIpColumn { .. }));
        assert_eq!(stage.state(), StageState::AwaitingHeader);
    }

    #[test]
    fn test_header_is_not_looked_up() {
        struct PanickingLookup;
        impl GeoLookup for PanickingLookup {
            fn lookup(&self, ip: &str) -> Option<serde_json::Value> {
                panic!("header label {ip} must not be looked up");
            }
        }
        let enricher = Arc::new(Enricher::new(
            Arc::new(PanickingLookup),
            Arc::new(PanickingLookup),
            AttributeProfile::Extended,
        ));
        let mut stage = EnrichStage::new(enricher, "client_ip");
        let header = stage.process(normalize_nulls(["client_ip"])).unwrap();
        assert_eq!(header.fields.len(), 15);
    }

    #[test]
    fn test_data_enricher_available_after_header() {
        let mut stage = EnrichStage::new(enricher(AttributeProfile::Basic), "client_ip");
        assert!(stage.data_enricher().is_none());
        stage.process(normalize_nulls(["a", "b", "client_ip"])).unwrap();

        let data = stage.data_enricher().unwrap();
        assert_eq!(data.ip_column(), 2);
        let row = data.enrich_raw(["x", "y", "8.8.8.8"]);
        assert_eq!(row.fields[3].as_deref(), Some("US"));
    }

    #[test]
    fn test_localized_enricher() {
        let table = Arc::new(LocalizationTable::korean().unwrap());
        let city = MapLookup::new().with(
            "1.201.0.1",
            json!({
                "country": { "iso_code": "KR", "names": { "en": "South Korea" } },
                "subdivisions": [ { "iso_code": "11", "names": { "en": "Seoul" } } ]
            }),
        );
        let enricher = Enricher::new(
            Arc::new(city),
            Arc::new(MapLookup::new()),
            AttributeProfile::Extended,
        )
        .with_localization(table);

        let attrs = enricher.attributes_for(Some("1.201.0.1"));
        let values: Vec<_> = attrs.iter().collect();
        assert!(values.contains(&("countryCode", Some("KR"))));
        assert!(values.contains(&("countryName", Some("대한민국"))));
        assert!(values.contains(&("regionName", Some("서울특별시"))));
    }
}
