//! Streaming pipeline assembly.
//!
//! ```text
//! input bytes -> csv reader -> enrichment stage -> csv writer -> output bytes
//! ```
//!
//! The csv reader and writer run on blocking threads connected to the async
//! enrichment loop by bounded channels, so a slow writer stalls the reader
//! instead of buffering the whole input. Data records are enriched through an
//! [`OrderedPool`], which keeps at most `concurrency` records in flight and
//! releases them in input order.

mod ordered;

use std::io::{Read, Write};
use std::path::Path;
use std::time::Instant;

use tempfile::NamedTempFile;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::app::log_progress;
use crate::enrich::{normalize_nulls, EnrichStage, EnrichedRecord, Record};
use crate::error_handling::EnrichError;
use crate::geoip::Source;

pub use ordered::OrderedPool;

/// Stream-level settings.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Field delimiter for both parsing and serialization
    pub delimiter: u8,
    /// Maximum records in flight through the enrichment stage
    pub concurrency: usize,
    /// Data records between progress log lines (0 disables)
    pub progress_interval: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            concurrency: crate::config::DEFAULT_CONCURRENCY,
            progress_interval: crate::config::DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Counts gathered while streaming.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamReport {
    /// Data records written (header excluded)
    pub records: usize,
    /// Data records for which at least one attribute resolved
    pub matched: usize,
    /// Data records with at least one city attribute
    pub city_matched: usize,
    /// Data records with at least one ASN attribute
    pub asn_matched: usize,
}

impl StreamReport {
    /// Data records with at least one attribute from `source`.
    pub fn matched_from(&self, source: Source) -> usize {
        match source {
            Source::City => self.city_matched,
            Source::Asn => self.asn_matched,
        }
    }
}

/// Streams `input` through `stage` into `output`.
///
/// Returns the counts and the output sink once everything has been flushed.
/// An input with no records produces no output.
///
/// # Errors
///
/// - [`EnrichError::Csv`] when the input is malformed (including rows whose
///   field count differs from the header) or output cannot be serialized
/// - [`EnrichError::MissingIpColumn`] when the header lacks the IP column
/// - [`EnrichError::Io`] / [`EnrichError::WorkerFailed`] on I/O or worker failure
///
/// Records preceding a failure may already have been written to `output`;
/// [`enrich_into_file`] avoids that for file destinations.
pub async fn enrich_stream<R, W>(
    input: R,
    output: W,
    mut stage: EnrichStage,
    options: &PipelineOptions,
) -> Result<(StreamReport, W), EnrichError>
where
    R: Read + Send + 'static,
    W: Write + Send + 'static,
{
    let capacity = options.concurrency.max(1);
    let (record_tx, mut record_rx) = mpsc::channel::<Result<Record, csv::Error>>(capacity);
    let (output_tx, output_rx) = mpsc::channel::<Record>(capacity);

    let reader_task = spawn_reader(input, options.delimiter, record_tx);
    let writer_task = spawn_writer(output, options.delimiter, output_rx);

    let mut report = StreamReport::default();
    let start_time = Instant::now();

    let streamed = async {
        let Some(header) = record_rx.recv().await else {
            return Ok(());
        };
        let header = stage.process(header?)?;
        forward(&output_tx, header).await?;

        let Some(data_enricher) = stage.data_enricher() else {
            return Err(EnrichError::WorkerFailed(
                "stage did not leave the header state".to_string(),
            ));
        };

        let mut pool = OrderedPool::new(capacity);
        while let Some(record) = record_rx.recv().await {
            let record = record?;
            while pool.is_full() {
                if let Some(enriched) = pool.next().await {
                    emit(&output_tx, enriched?, &mut report, options, start_time).await?;
                }
            }
            let data_enricher = data_enricher.clone();
            pool.submit(move || data_enricher.enrich(record));
            while let Some(enriched) = pool.try_next() {
                emit(&output_tx, enriched?, &mut report, options, start_time).await?;
            }
        }
        while let Some(enriched) = pool.next().await {
            emit(&output_tx, enriched?, &mut report, options, start_time).await?;
        }
        Ok::<(), EnrichError>(())
    }
    .await;

    // Closing the channel lets the writer flush and finish
    drop(output_tx);
    drop(record_rx);

    let streamed = match streamed {
        // End of input was seen, so the reader has already returned
        Ok(()) => reader_task
            .await
            .map_err(|e| EnrichError::WorkerFailed(format!("csv reader: {}", e))),
        Err(e) => {
            // The reader may be blocked on input; it stops at its next send
            drop(reader_task);
            Err(e)
        }
    };

    let written = join_worker(writer_task).await;

    match (streamed, written) {
        (Err(EnrichError::WorkerFailed(_)), Err(writer_err)) => Err(writer_err),
        (Err(e), _) => Err(e),
        (Ok(()), Err(e)) => Err(e),
        (Ok(()), Ok(output)) => {
            if options.progress_interval > 0 {
                log_progress(start_time, report.records);
            }
            Ok((report, output))
        }
    }
}

/// Streams `input` into the file at `path`, replacing it only on success.
///
/// Output is staged in a temporary file in the same directory and renamed over
/// `path` once the stream has completed. On any error `path` is left as it
/// was and the staged file is removed.
///
/// # Errors
///
/// Everything [`enrich_stream`] reports, plus [`EnrichError::Io`] when the
/// staging file cannot be created or moved into place.
pub async fn enrich_into_file<R>(
    input: R,
    path: &Path,
    stage: EnrichStage,
    options: &PipelineOptions,
) -> Result<StreamReport, EnrichError>
where
    R: Read + Send + 'static,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staging = NamedTempFile::new_in(dir)?;
    // Keep the mode of a file being replaced
    if let Ok(existing) = std::fs::metadata(path) {
        staging.as_file().set_permissions(existing.permissions())?;
    }

    let (report, staging) = enrich_stream(input, staging, stage, options).await?;
    staging
        .persist(path)
        .map_err(|e| EnrichError::Io(e.error))?;
    log::debug!("Wrote {}", path.display());
    Ok(report)
}

async fn emit(
    output_tx: &mpsc::Sender<Record>,
    enriched: EnrichedRecord,
    report: &mut StreamReport,
    options: &PipelineOptions,
    start_time: Instant,
) -> Result<(), EnrichError> {
    report.records += 1;
    report.matched += usize::from(enriched.matched);
    report.city_matched += usize::from(enriched.city_matched);
    report.asn_matched += usize::from(enriched.asn_matched);
    if options.progress_interval > 0 && report.records % options.progress_interval == 0 {
        log_progress(start_time, report.records);
    }
    forward(output_tx, enriched).await
}

async fn forward(output_tx: &mpsc::Sender<Record>, enriched: EnrichedRecord) -> Result<(), EnrichError> {
    output_tx
        .send(enriched.fields)
        .await
        .map_err(|_| EnrichError::WorkerFailed("output writer stopped".to_string()))
}

fn spawn_reader<R>(
    input: R,
    delimiter: u8,
    record_tx: mpsc::Sender<Result<Record, csv::Error>>,
) -> JoinHandle<()>
where
    R: Read + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .from_reader(input);

        for result in reader.into_records() {
            let failed = result.is_err();
            let item = result.map(|record| normalize_nulls(record.iter()));
            if record_tx.blocking_send(item).is_err() || failed {
                break;
            }
        }
    })
}

fn spawn_writer<W>(
    output: W,
    delimiter: u8,
    mut output_rx: mpsc::Receiver<Record>,
) -> JoinHandle<Result<W, EnrichError>>
where
    W: Write + Send + 'static,
{
    tokio::task::spawn_blocking(move || -> Result<W, EnrichError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(output);

        while let Some(record) = output_rx.blocking_recv() {
            writer.write_record(record.iter().map(|field| field.as_deref().unwrap_or("")))?;
        }
        writer.flush()?;
        writer.into_inner().map_err(|e| EnrichError::Io(e.into_error()))
    })
}

async fn join_worker<T>(handle: JoinHandle<Result<T, EnrichError>>) -> Result<T, EnrichError> {
    handle
        .await
        .map_err(|e| EnrichError::WorkerFailed(e.to_string()))?
}
