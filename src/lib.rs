//! geoip_enrich library: streaming GeoIP enrichment of delimited records
//!
//! This library reads CSV (or any single-byte-delimited) records, looks up the
//! value of an IP column in MaxMind GeoLite2 City and ASN databases, and
//! appends location and network-owner columns to every record.
//!
//! # Example
//!
//! ```no_run
//! use geoip_enrich::{Config, run_enrichment};
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     input: Some(PathBuf::from("access_log.csv")),
//!     output: Some(PathBuf::from("access_log_geo.csv")),
//!     ..Default::default()
//! };
//!
//! let report = run_enrichment(config).await?;
//! println!("{} records, {} matched", report.records, report.matched);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod app;
pub mod config;
pub mod enrich;
pub mod error_handling;
pub mod geoip;
pub mod initialization;
pub mod pipeline;

// Re-export public API
pub use app::EnrichReport;
pub use config::{Config, LogFormat, LogLevel, Opt};
pub use run::run_enrichment;

// Internal run module (contains the top-level orchestration)
mod run {
    use std::fs::File;
    use std::io::{self, Read};
    use std::sync::Arc;
    use std::time::Instant;

    use anyhow::{Context, Result};
    use log::info;

    use crate::app::EnrichReport;
    use crate::config::Config;
    use crate::enrich::{EnrichStage, Enricher};
    use crate::initialization::{init_localization, open_databases};
    use crate::pipeline::{enrich_into_file, enrich_stream, PipelineOptions};

    /// Runs an enrichment pass with the provided configuration.
    ///
    /// Opens both databases (failing before any output is produced if either
    /// cannot be loaded), then streams the input through the enrichment stage
    /// to the output.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - Either database cannot be read or parsed
    /// - The localization table cannot be loaded
    /// - The input file cannot be opened, or the output file cannot be written
    /// - The header lacks the IP column, or the input is malformed
    pub async fn run_enrichment(config: Config) -> Result<EnrichReport> {
        let start_time = Instant::now();

        let databases = open_databases(&config.city_db, &config.asn_db)
            .await
            .context("Failed to open GeoIP databases")?;
        let localization = init_localization(&config)
            .await
            .context("Failed to initialize localization")?;

        let city_metadata = databases.city.metadata().clone();
        let asn_metadata = databases.asn.metadata().clone();

        let mut enricher = Enricher::new(
            Arc::new(databases.city),
            Arc::new(databases.asn),
            config.profile,
        );
        if let Some(table) = localization {
            enricher = enricher.with_localization(table);
        }
        let stage = EnrichStage::new(Arc::new(enricher), config.ip_column.clone());

        let input: Box<dyn Read + Send> = match &config.input {
            Some(path) => Box::new(
                File::open(path)
                    .with_context(|| format!("Failed to open input file: {}", path.display()))?,
            ),
            None => {
                info!("Reading records from stdin");
                Box::new(io::stdin())
            }
        };

        let options = PipelineOptions {
            delimiter: config.delimiter,
            concurrency: config.concurrency,
            progress_interval: config.progress_interval,
        };
        info!(
            "Enriching column {:?} (delimiter {:?}, concurrency {}, profile {:?}, localized: {})",
            config.ip_column,
            char::from(config.delimiter),
            options.concurrency,
            config.profile,
            config.localization.is_some()
        );

        // A file is only replaced once the whole stream succeeded
        let stream_report = match &config.output {
            Some(path) => enrich_into_file(input, path, stage, &options)
                .await
                .with_context(|| format!("Failed to enrich records into {}", path.display()))?,
            None => {
                enrich_stream(input, io::stdout(), stage, &options)
                    .await
                    .context("Failed to enrich records")?
                    .0
            }
        };

        let report = EnrichReport::new(
            stream_report,
            start_time.elapsed().as_secs_f64(),
            city_metadata,
            asn_metadata,
        );
        info!("{}", report);
        report.log_breakdown();
        Ok(report)
    }
}
