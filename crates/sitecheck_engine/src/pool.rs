use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use probe_logging::{probe_debug, probe_error, probe_warn};
use sitecheck_core::{Disposition, FailureKind, Job, ProbeOutcome};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::{EventSink, JobQueue, ProbeEvent, Prober, QueueError};

pub const DEFAULT_USER_AGENT: &str = concat!("sitecheck/", env!("CARGO_PKG_VERSION"));

/// Per-worker settings, fixed when the pool starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub id: usize,
    pub user_agent: String,
    pub max_attempts: u32,
}

/// Hands out identifying header values round-robin, one per worker.
pub fn assign_user_agents(
    user_agents: &[String],
    worker_count: usize,
    max_attempts: u32,
) -> Vec<WorkerConfig> {
    (0..worker_count)
        .map(|id| {
            let user_agent = if user_agents.is_empty() {
                DEFAULT_USER_AGENT.to_string()
            } else {
                user_agents[id % user_agents.len()].clone()
            };
            WorkerConfig {
                id,
                user_agent,
                max_attempts,
            }
        })
        .collect()
}

pub fn spawn_workers(
    configs: Vec<WorkerConfig>,
    prober: Arc<dyn Prober>,
    queue: &JobQueue,
    results: &mpsc::UnboundedSender<Job>,
    sink: Arc<dyn EventSink>,
) -> JoinSet<()> {
    let mut workers = JoinSet::new();
    for config in configs {
        let prober = prober.clone();
        let queue = queue.clone();
        let results = results.clone();
        let sink = sink.clone();
        workers.spawn(async move {
            run_worker(config, prober.as_ref(), queue, results, sink.as_ref()).await;
        });
    }
    workers
}

/// Runs one attempt, turning a panic inside the prober into a fatal outcome
/// so the job survives it.
async fn probe_once(prober: &dyn Prober, url: &str, user_agent: &str) -> ProbeOutcome {
    match AssertUnwindSafe(prober.probe(url, user_agent))
        .catch_unwind()
        .await
    {
        Ok(outcome) => outcome,
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            probe_warn!("prober panicked on {}: {}", url, reason);
            ProbeOutcome::fatal(FailureKind::Panicked, format!("{url}: {reason}"))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg
    } else {
        "unknown panic"
    }
}

async fn run_worker(
    config: WorkerConfig,
    prober: &dyn Prober,
    queue: JobQueue,
    results: mpsc::UnboundedSender<Job>,
    sink: &dyn EventSink,
) {
    probe_debug!("worker {} started ({})", config.id, config.user_agent);

    while let Some(job) = queue.next().await {
        match job.into_disposition(config.max_attempts) {
            Disposition::Exhausted(job) => {
                sink.emit(ProbeEvent::Finalized {
                    url: job.url().to_string(),
                    success_count: job.success_count(),
                    try_count: job.try_count(),
                });
                if results.send(job).is_err() {
                    probe_debug!("worker {}: collector gone, stopping", config.id);
                    break;
                }
            }
            Disposition::Active(active) => {
                let attempt = active.attempt();
                let outcome = probe_once(prober, active.url(), &config.user_agent).await;
                probe_debug!(
                    "worker {} attempt {} for {}: {}",
                    config.id,
                    attempt,
                    active.url(),
                    outcome
                );
                let job = active.record(&outcome);
                sink.emit(ProbeEvent::Attempt {
                    worker: config.id,
                    url: job.url().to_string(),
                    attempt,
                    outcome,
                });
                if let Err(QueueError::Closed(job)) = queue.submit(job) {
                    probe_error!(
                        "worker {}: queue closed with {} still pending at attempt {}",
                        config.id,
                        job.url(),
                        job.try_count()
                    );
                    break;
                }
            }
        }
    }

    probe_debug!("worker {} stopped", config.id);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agents(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn user_agents_rotate_across_workers() {
        let configs = assign_user_agents(&agents(&["a", "b"]), 5, 3);
        let assigned: Vec<_> = configs.iter().map(|c| c.user_agent.as_str()).collect();
        assert_eq!(assigned, vec!["a", "b", "a", "b", "a"]);
        assert!(configs.iter().all(|c| c.max_attempts == 3));
        assert_eq!(configs[4].id, 4);
    }

    #[test]
    fn panic_payloads_are_readable() {
        let boxed: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(boxed.as_ref()), "static message");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(boxed.as_ref()), "owned message");
        let boxed: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }

    #[test]
    fn empty_agent_list_falls_back_to_default() {
        let configs = assign_user_agents(&[], 2, 1);
        assert!(configs.iter().all(|c| c.user_agent == DEFAULT_USER_AGENT));
        assert!(DEFAULT_USER_AGENT.starts_with("sitecheck/"));
    }
}
