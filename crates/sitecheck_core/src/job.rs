use crate::{FailureKind, ProbeOutcome};

/// One URL's trip through the probe queue.
///
/// A `Job` is moved between the queue and whichever worker currently holds
/// it; it is never shared. Counters can only be advanced through
/// [`ActiveJob::record`], which is unreachable once the attempt budget is
/// spent.
#[derive(Debug, PartialEq, Eq)]
pub struct Job {
    url: String,
    success_count: u32,
    try_count: u32,
    errors: Vec<String>,
}

/// Where a dequeued job goes next.
#[derive(Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Attempt budget spent; hand the job to the collector.
    Exhausted(Job),
    /// At least one attempt left; probe it.
    Active(ActiveJob),
}

/// A job that is allowed to make one more attempt.
#[derive(Debug, PartialEq, Eq)]
pub struct ActiveJob {
    job: Job,
}

impl Job {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            success_count: 0,
            try_count: 0,
            errors: Vec::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn success_count(&self) -> u32 {
        self.success_count
    }

    pub fn try_count(&self) -> u32 {
        self.try_count
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_disposition(self, max_attempts: u32) -> Disposition {
        if self.try_count >= max_attempts {
            Disposition::Exhausted(self)
        } else {
            Disposition::Active(ActiveJob { job: self })
        }
    }

    pub(crate) fn into_parts(self) -> (String, u32, u32, Vec<String>) {
        (self.url, self.success_count, self.try_count, self.errors)
    }
}

impl ActiveJob {
    pub fn url(&self) -> &str {
        &self.job.url
    }

    /// 1-based number of the attempt about to be made.
    pub fn attempt(&self) -> u32 {
        self.job.try_count + 1
    }

    /// Folds one attempt's outcome into the job and gives it back for requeueing.
    ///
    /// Only a 2xx success clears `errors`; a non-2xx status neither clears nor
    /// appends, and every other failure appends its message.
    pub fn record(self, outcome: &ProbeOutcome) -> Job {
        let mut job = self.job;
        job.try_count += 1;
        match outcome {
            ProbeOutcome::Success { .. } => {
                job.success_count += 1;
                job.errors.clear();
            }
            // A bad status lowers the ratio; it is not an error.
            ProbeOutcome::Failure(err) if matches!(err.kind, FailureKind::HttpStatus(_)) => {}
            ProbeOutcome::Failure(err) | ProbeOutcome::Fatal(err) => {
                job.errors.push(err.to_string());
            }
        }
        job
    }
}
