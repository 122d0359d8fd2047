//! Progress logging utilities.

use log::info;
use std::time::Instant;

/// Logs progress information about record processing.
///
/// # Arguments
///
/// * `start_time` - The start time of processing
/// * `records` - Data records written so far
pub fn log_progress(start_time: Instant, records: usize) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    info!(
        "Processed {} records in {:.2} seconds (~{:.2} records/sec)",
        records,
        elapsed_secs,
        records_per_second(records, elapsed_secs)
    );
}

/// Throughput, or zero when no time has elapsed.
pub(crate) fn records_per_second(records: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        // Record counts stay far below 2^53, so the cast is exact
        #[allow(clippy::cast_precision_loss)]
        let records = records as f64;
        records / elapsed_secs
    } else {
        0.0
    }
}
