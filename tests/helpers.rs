// Shared test helpers for building lookups and running the pipeline.
//
// This module provides common fixtures used across multiple test files to reduce duplication.

use std::sync::Arc;

use serde_json::{json, Value};

use geoip_enrich::enrich::{EnrichStage, Enricher};
use geoip_enrich::error_handling::EnrichError;
use geoip_enrich::geoip::{AttributeProfile, LocalizationTable, MapLookup};
use geoip_enrich::pipeline::{enrich_stream, PipelineOptions, StreamReport};

/// City record for 8.8.8.8 as GeoLite2-City reports it (trimmed).
pub fn us_city() -> Value {
    json!({
        "city": { "geoname_id": 5375480, "names": { "en": "Mountain View" } },
        "continent": { "code": "NA", "geoname_id": 6255149, "names": { "en": "North America" } },
        "country": { "geoname_id": 6252001, "iso_code": "US", "names": { "en": "United States" } },
        "location": {
            "accuracy_radius": 1000,
            "latitude": 37.751,
            "longitude": -97.822,
            "time_zone": "America/Chicago"
        },
        "postal": { "code": "94043" },
        "subdivisions": [ { "geoname_id": 5332921, "iso_code": "CA", "names": { "en": "California" } } ]
    })
}

/// City record for a Seoul address.
pub fn kr_city() -> Value {
    json!({
        "city": { "geoname_id": 1835848, "names": { "en": "Seoul" } },
        "continent": { "code": "AS", "names": { "en": "Asia" } },
        "country": { "iso_code": "KR", "names": { "en": "South Korea" } },
        "location": {
            "accuracy_radius": 20,
            "latitude": 37.5111,
            "longitude": 126.9743,
            "time_zone": "Asia/Seoul"
        },
        "subdivisions": [ { "iso_code": "11", "names": { "en": "Seoul" } } ]
    })
}

/// City and ASN lookups knowing 8.8.8.8 and 211.234.1.1.
pub fn lookups() -> (MapLookup, MapLookup) {
    let city = MapLookup::new()
        .with("8.8.8.8", us_city())
        .with("211.234.1.1", kr_city());
    let asn = MapLookup::new()
        .with(
            "8.8.8.8",
            json!({ "autonomous_system_number": 15169, "autonomous_system_organization": "GOOGLE" }),
        )
        .with(
            "211.234.1.1",
            json!({ "autonomous_system_number": 9644, "autonomous_system_organization": "SK Telecom" }),
        );
    (city, asn)
}

/// Builds a stage over the fixture lookups.
pub fn stage(profile: AttributeProfile, localized: bool, ip_column: &str) -> EnrichStage {
    let (city, asn) = lookups();
    let mut enricher = Enricher::new(Arc::new(city), Arc::new(asn), profile);
    if localized {
        let table = LocalizationTable::korean().expect("built-in table should parse");
        enricher = enricher.with_localization(Arc::new(table));
    }
    EnrichStage::new(Arc::new(enricher), ip_column)
}

/// Runs `input` through the pipeline and returns the output text.
#[allow(dead_code)] // Used by other test files
pub async fn run_pipeline(
    input: &str,
    stage: EnrichStage,
    options: &PipelineOptions,
) -> Result<(StreamReport, String), EnrichError> {
    let (report, output) = enrich_stream(
        std::io::Cursor::new(input.as_bytes().to_vec()),
        Vec::new(),
        stage,
        options,
    )
    .await?;
    Ok((report, String::from_utf8(output).expect("output should be UTF-8")))
}

/// Parses delimited text into rows of fields.
#[allow(dead_code)] // Used by other test files
pub fn parse_rows(text: &str, delimiter: u8) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_reader(text.as_bytes())
        .records()
        .map(|r| {
            r.expect("output should parse")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect()
}
