//! Sitecheck engine: probe executor, retry queue, worker pool and collection.
mod collect;
mod engine;
mod error;
mod events;
mod pool;
mod probe;
mod queue;

pub use collect::collect;
pub use engine::ProbeEngine;
pub use error::EngineError;
pub use events::{ChannelSink, EventSink, NoopSink, ProbeEvent};
pub use pool::{assign_user_agents, spawn_workers, WorkerConfig, DEFAULT_USER_AGENT};
pub use probe::{ProbeSettings, Prober, ReqwestProber};
pub use queue::{JobQueue, QueueError};
pub use sitecheck_core::{
    FailureKind, Job, ProbeConfig, ProbeError, ProbeOutcome, ResultCollector, RunReport,
    UrlReport,
};
