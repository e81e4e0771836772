use std::io::{self, Write};

use probe_logging::probe_info;
use sitecheck_core::{RunReport, UrlReport};
use sitecheck_engine::{EventSink, ProbeEvent};

pub fn print_scanning(out: &mut impl Write, urls: &[String]) -> io::Result<()> {
    writeln!(out, "Scanning: [{}]", urls.join(" "))
}

pub fn print_result(out: &mut impl Write, result: &UrlReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "RESULTS: {}", result.url)?;
    writeln!(
        out,
        "site probe was successful {} out of {} attempts",
        result.success_count, result.max_attempts
    )?;
    if !result.errors.is_empty() {
        writeln!(out, "but had the following error(s):")?;
        for err in &result.errors {
            writeln!(out, "  - {err}")?;
        }
    }
    Ok(())
}

pub fn print_report(out: &mut impl Write, report: &RunReport) -> io::Result<()> {
    for result in &report.results {
        print_result(out, result)?;
    }
    writeln!(out)?;
    writeln!(out, "took: {:.6} seconds", report.elapsed.as_secs_f64())
}

/// Mirrors engine progress into the log at info level.
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: ProbeEvent) {
        match event {
            ProbeEvent::Attempt {
                worker,
                url,
                attempt,
                outcome,
            } => {
                probe_info!("[w{}] {} attempt {}: {}", worker, url, attempt, outcome);
            }
            ProbeEvent::Finalized {
                url,
                success_count,
                try_count,
            } => {
                probe_info!("{} done after {} attempts ({} ok)", url, try_count, success_count);
            }
        }
    }
}
