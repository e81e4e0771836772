use std::time::Duration;

use thiserror::Error;

use crate::{Job, RunReport, UrlReport};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectError {
    #[error("job for {url} finalized after {try_count} of {max_attempts} attempts")]
    Unfinished {
        url: String,
        try_count: u32,
        max_attempts: u32,
    },
    #[error("received more than the {expected} expected results ({url})")]
    Overflow { url: String, expected: usize },
}

/// Counts finalized jobs until exactly `expected` have arrived.
///
/// Owned by the single collecting loop, so it needs no synchronization.
#[derive(Debug)]
pub struct ResultCollector {
    expected: usize,
    max_attempts: u32,
    received: Vec<UrlReport>,
}

impl ResultCollector {
    pub fn new(expected: usize, max_attempts: u32) -> Self {
        Self {
            expected,
            max_attempts,
            received: Vec::with_capacity(expected),
        }
    }

    pub fn accept(&mut self, job: Job) -> Result<&UrlReport, CollectError> {
        if self.is_complete() {
            return Err(CollectError::Overflow {
                url: job.url().to_string(),
                expected: self.expected,
            });
        }
        if job.try_count() != self.max_attempts {
            return Err(CollectError::Unfinished {
                url: job.url().to_string(),
                try_count: job.try_count(),
                max_attempts: self.max_attempts,
            });
        }
        self.received
            .push(UrlReport::from_job(job, self.max_attempts));
        Ok(&self.received[self.received.len() - 1])
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn received(&self) -> usize {
        self.received.len()
    }

    pub fn remaining(&self) -> usize {
        self.expected - self.received.len()
    }

    pub fn is_complete(&self) -> bool {
        self.received.len() >= self.expected
    }

    pub fn finish(self, elapsed: Duration) -> RunReport {
        RunReport {
            max_attempts: self.max_attempts,
            elapsed,
            results: self.received,
        }
    }
}
