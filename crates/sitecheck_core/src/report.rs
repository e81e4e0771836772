use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Job;

/// Final outcome for one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlReport {
    pub url: String,
    pub success_count: u32,
    pub try_count: u32,
    pub max_attempts: u32,
    pub errors: Vec<String>,
}

impl UrlReport {
    pub(crate) fn from_job(job: Job, max_attempts: u32) -> Self {
        let (url, success_count, try_count, errors) = job.into_parts();
        Self {
            url,
            success_count,
            try_count,
            max_attempts,
            errors,
        }
    }

    pub fn success_ratio(&self) -> f64 {
        if self.max_attempts == 0 {
            return 0.0;
        }
        f64::from(self.success_count) / f64::from(self.max_attempts)
    }

    pub fn is_healthy(&self) -> bool {
        self.success_count > 0
    }
}

/// Aggregate of a whole run, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub max_attempts: u32,
    pub elapsed: Duration,
    pub results: Vec<UrlReport>,
}

impl RunReport {
    pub fn empty(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            elapsed: Duration::ZERO,
            results: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn total_successes(&self) -> u64 {
        self.results
            .iter()
            .map(|r| u64::from(r.success_count))
            .sum()
    }

    pub fn total_attempts(&self) -> u64 {
        self.results.iter().map(|r| u64::from(r.try_count)).sum()
    }

    pub fn find(&self, url: &str) -> Option<&UrlReport> {
        self.results.iter().find(|r| r.url == url)
    }
}
