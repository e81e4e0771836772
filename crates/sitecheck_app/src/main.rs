mod cli;
mod input;
mod output;
mod report_file;
mod user_agents;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use probe_logging::{level_for_verbosity, probe_info, LogDestination};
use sitecheck_engine::ProbeEngine;

use cli::Cli;
use output::LogSink;
use report_file::{write_json_report, JsonReport};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let destination = if cli.log_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    probe_logging::initialize(destination, level_for_verbosity(cli.verbose));

    let config = cli.resolve_config()?;
    let urls = input::gather_urls(&cli)?;

    output::print_scanning(&mut io::stdout().lock(), &urls)?;

    let engine = ProbeEngine::with_reqwest(config)
        .context("unable to start probe engine")?
        .with_sink(Arc::new(LogSink));
    let report = engine.run(urls).await.context("probe run failed")?;

    output::print_report(&mut io::stdout().lock(), &report)?;

    if let Some(path) = &cli.json {
        let json = JsonReport::new(&report, Utc::now().to_rfc3339());
        write_json_report(path, &json)?;
        probe_info!("Wrote JSON report to {:?}", path);
    }

    Ok(())
}
