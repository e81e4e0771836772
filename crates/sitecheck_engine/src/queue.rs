use std::sync::Arc;

use sitecheck_core::Job;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum QueueError {
    /// The job is handed back so the caller still owns it.
    #[error("job queue is closed")]
    Closed(Job),
}

/// Shared queue of pending probe attempts.
///
/// Fed by the initial submission and by workers re-submitting jobs that still
/// have attempts left. Storage is unbounded, so `submit` never waits on
/// capacity; the number of jobs in flight is at most the number of URLs.
/// Closing is explicit: consumers stop as soon as [`JobQueue::close`] is
/// called, regardless of what is still buffered.
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::UnboundedSender<Job>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<Job>>>,
    closed: CancellationToken,
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl JobQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
            closed: CancellationToken::new(),
        }
    }

    pub fn submit(&self, job: Job) -> Result<(), QueueError> {
        if self.closed.is_cancelled() {
            return Err(QueueError::Closed(job));
        }
        // The queue owns a receiver for as long as any handle exists, so the
        // send can only fail if that invariant is broken.
        self.tx.send(job).map_err(|err| QueueError::Closed(err.0))
    }

    /// Waits for the next job. Returns `None` once the queue is closed.
    pub async fn next(&self) -> Option<Job> {
        tokio::select! {
            biased;
            _ = self.closed.cancelled() => None,
            job = async { self.rx.lock().await.recv().await } => job,
        }
    }

    pub fn close(&self) {
        self.closed.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }
}
