use probe_logging::probe_info;
use sitecheck_core::{Job, ResultCollector};
use tokio::sync::mpsc;

use crate::EngineError;

/// Receives finalized jobs until the collector has every expected result.
///
/// Returns `WorkersExited` instead of waiting forever if the channel closes
/// first, which means every worker has stopped.
pub async fn collect(
    results: &mut mpsc::UnboundedReceiver<Job>,
    collector: &mut ResultCollector,
) -> Result<(), EngineError> {
    while !collector.is_complete() {
        let Some(job) = results.recv().await else {
            return Err(EngineError::WorkersExited {
                received: collector.received(),
                expected: collector.expected(),
            });
        };
        let report = collector.accept(job)?;
        probe_info!(
            "{} finished: {}/{} successful",
            report.url,
            report.success_count,
            report.max_attempts
        );
    }
    Ok(())
}
