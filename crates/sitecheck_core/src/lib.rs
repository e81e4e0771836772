//! Sitecheck core: pure job model, retry state machine and result aggregation.
mod collector;
mod config;
mod job;
mod outcome;
mod report;

pub use collector::{CollectError, ResultCollector};
pub use config::{
    ConfigError, ProbeConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_SECS, DEFAULT_WORKER_COUNT,
};
pub use job::{ActiveJob, Disposition, Job};
pub use outcome::{FailureKind, ProbeError, ProbeOutcome};
pub use report::{RunReport, UrlReport};
