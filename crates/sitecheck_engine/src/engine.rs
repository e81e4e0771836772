use std::sync::Arc;
use std::time::Instant;

use probe_logging::{probe_error, probe_info, probe_warn};
use sitecheck_core::{Job, ProbeConfig, ResultCollector, RunReport};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};

use crate::{
    assign_user_agents, collect, spawn_workers, EngineError, EventSink, JobQueue, NoopSink,
    ProbeSettings, Prober, ReqwestProber,
};

/// Runs a batch of URLs through a fixed pool of probing workers.
pub struct ProbeEngine {
    config: ProbeConfig,
    prober: Arc<dyn Prober>,
    sink: Arc<dyn EventSink>,
}

impl ProbeEngine {
    pub fn new(config: ProbeConfig, prober: Arc<dyn Prober>) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            prober,
            sink: Arc::new(NoopSink),
        })
    }

    pub fn with_reqwest(config: ProbeConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let prober = ReqwestProber::new(ProbeSettings::from(&config))?;
        Self::new(config, Arc::new(prober))
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Probes every URL `max_attempts` times and returns one result per URL.
    ///
    /// The queue is only closed after the last expected result is in, so no
    /// job can be dropped while it still has attempts left. A worker that
    /// dies before then may have taken a job with it, so the run stops with
    /// `WorkersExited`.
    pub async fn run(&self, urls: Vec<String>) -> Result<RunReport, EngineError> {
        let start = Instant::now();
        let max_attempts = self.config.max_attempts;
        if urls.is_empty() {
            return Ok(RunReport::empty(max_attempts));
        }

        let queue = JobQueue::new();
        let (results_tx, mut results_rx) = mpsc::unbounded_channel::<Job>();
        let configs = assign_user_agents(
            &self.config.user_agents,
            self.config.worker_count,
            max_attempts,
        );
        let mut workers = spawn_workers(
            configs,
            self.prober.clone(),
            &queue,
            &results_tx,
            self.sink.clone(),
        );
        // Only workers hold senders now; the channel closes if they all stop.
        drop(results_tx);

        let mut collector = ResultCollector::new(urls.len(), max_attempts);
        probe_info!(
            "probing {} urls with {} workers, {} attempts each",
            urls.len(),
            workers.len(),
            max_attempts
        );
        for url in urls {
            if queue.submit(Job::new(url)).is_err() {
                queue.close();
                return Err(EngineError::QueueClosed);
            }
        }

        let collected = tokio::select! {
            biased;
            collected = collect(&mut results_rx, &mut collector) => collected,
            Some(err) = first_abnormal_exit(&mut workers) => {
                probe_error!("worker task ended abnormally: {}", err);
                Err(EngineError::WorkersExited {
                    received: collector.received(),
                    expected: collector.expected(),
                })
            }
        };
        queue.close();
        while let Some(joined) = workers.join_next().await {
            if let Err(err) = joined {
                probe_warn!("worker task ended abnormally: {}", err);
            }
        }
        collected?;

        let report = collector.finish(start.elapsed());
        probe_info!(
            "run finished in {:.2}s: {} of {} attempts successful",
            report.elapsed.as_secs_f64(),
            report.total_successes(),
            report.total_attempts()
        );
        Ok(report)
    }
}

/// Resolves with the first worker that failed; `None` once all have ended.
async fn first_abnormal_exit(workers: &mut JoinSet<()>) -> Option<JoinError> {
    while let Some(joined) = workers.join_next().await {
        if let Err(err) = joined {
            return Some(err);
        }
    }
    None
}
