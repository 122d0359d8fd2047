//! Ordered, bounded-parallelism worker pool.
//!
//! Jobs run on the blocking thread pool and may finish in any order. Each
//! job is tagged with its submission sequence number; finished outputs wait
//! in a sequencing buffer until every earlier output has been released, so
//! callers observe outputs strictly in submission order.
//!
//! At most `window` jobs are outstanding (running, or finished but not yet
//! released). Callers check [`OrderedPool::is_full`] and drain with
//! [`OrderedPool::next`] before submitting more.

use std::collections::BTreeMap;

use tokio::sync::mpsc;

use crate::error_handling::EnrichError;

type JobOutput<T> = Result<T, String>;

/// Worker pool that releases outputs in submission order.
pub struct OrderedPool<T> {
    window: usize,
    results_tx: mpsc::UnboundedSender<(u64, JobOutput<T>)>,
    results_rx: mpsc::UnboundedReceiver<(u64, JobOutput<T>)>,
    pending: BTreeMap<u64, JobOutput<T>>,
    next_submit: u64,
    next_release: u64,
}

impl<T: Send + 'static> OrderedPool<T> {
    /// Creates a pool allowing `window` outstanding jobs (minimum 1).
    pub fn new(window: usize) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            window: window.max(1),
            results_tx,
            results_rx,
            pending: BTreeMap::new(),
            next_submit: 0,
            next_release: 0,
        }
    }

    /// Jobs submitted but not yet released.
    pub fn outstanding(&self) -> usize {
        // Bounded by `window`, which is a usize
        #[allow(clippy::cast_possible_truncation)]
        let outstanding = (self.next_submit - self.next_release) as usize;
        outstanding
    }

    /// True when no more jobs may be submitted until an output is released.
    pub fn is_full(&self) -> bool {
        self.outstanding() >= self.window
    }

    /// Starts `job` on the blocking pool.
    ///
    /// Callers must not submit while [`OrderedPool::is_full`] returns true;
    /// doing so only widens the window, it never blocks.
    pub fn submit<F>(&mut self, job: F)
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let seq = self.next_submit;
        self.next_submit += 1;

        let tx = self.results_tx.clone();
        tokio::spawn(async move {
            let output = tokio::task::spawn_blocking(job)
                .await
                .map_err(|e| e.to_string());
            // The receiver only disappears when the pool is dropped mid-stream
            let _ = tx.send((seq, output));
        });
    }

    /// Releases the next output in order if it has already finished.
    pub fn try_next(&mut self) -> Option<Result<T, EnrichError>> {
        while let Ok((seq, output)) = self.results_rx.try_recv() {
            self.pending.insert(seq, output);
        }
        self.release()
    }

    /// Waits for the next output in order. Returns `None` when nothing is outstanding.
    pub async fn next(&mut self) -> Option<Result<T, EnrichError>> {
        if self.outstanding() == 0 {
            return None;
        }
        loop {
            if let Some(output) = self.release() {
                return Some(output);
            }
            match self.results_rx.recv().await {
                Some((seq, output)) => {
                    self.pending.insert(seq, output);
                }
                None => {
                    return Some(Err(EnrichError::WorkerFailed(
                        "result channel closed".to_string(),
                    )))
                }
            }
        }
    }

    fn release(&mut self) -> Option<Result<T, EnrichError>> {
        let output = self.pending.remove(&self.next_release)?;
        self.next_release += 1;
        Some(output.map_err(EnrichError::WorkerFailed))
    }
}
