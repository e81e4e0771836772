use tokio::sync::mpsc;

use sitecheck_core::ProbeOutcome;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeEvent {
    /// One probe attempt finished and was folded into its job.
    Attempt {
        worker: usize,
        url: String,
        attempt: u32,
        outcome: ProbeOutcome,
    },
    /// A job spent its attempt budget and went to the collector.
    Finalized {
        url: String,
        success_count: u32,
        try_count: u32,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: ProbeEvent);
}

pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: ProbeEvent) {}
}

pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ProbeEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<ProbeEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: ProbeEvent) {
        let _ = self.tx.send(event);
    }
}
