use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use probe_logging::probe_info;
use sitecheck_core::ProbeConfig;

use crate::user_agents::default_user_agents;

#[derive(Parser, Debug)]
#[command(name = "sitecheck", version)]
#[command(about = "Probe URLs over HTTP, retrying failures, and report how often each answered")]
pub struct Cli {
    /// URL to probe (repeatable)
    #[arg(short = 'u', long = "url", value_name = "URL")]
    pub urls: Vec<String>,

    /// File with one URL per line
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Attempts per URL [default: 3]
    #[arg(short = 'a', long, value_name = "N")]
    pub attempts: Option<u32>,

    /// Per-request timeout in seconds [default: 5]
    #[arg(short = 't', long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of concurrent workers [default: 3]
    #[arg(short = 'w', long, value_name = "N")]
    pub workers: Option<usize>,

    /// RON file with probe settings; flags override it
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// User-Agent value to send (repeatable, assigned to workers in turn)
    #[arg(long = "user-agent", value_name = "UA")]
    pub user_agents: Vec<String>,

    /// Also write the report as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Log each attempt (-v) or debug output (-vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Also write logs to ./sitecheck.log
    #[arg(long)]
    pub log_file: bool,
}

impl Cli {
    /// Defaults, then the config file, then flags.
    pub fn resolve_config(&self) -> Result<ProbeConfig> {
        let base = match &self.config {
            Some(path) => load_config_file(path)?,
            None => ProbeConfig::default(),
        };
        let config = self.apply_overrides(base);
        config.validate().context("invalid probe settings")?;
        Ok(config)
    }

    fn apply_overrides(&self, mut config: ProbeConfig) -> ProbeConfig {
        if let Some(attempts) = self.attempts {
            config.max_attempts = attempts;
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if let Some(workers) = self.workers {
            config.worker_count = workers;
        }
        if !self.user_agents.is_empty() {
            config.user_agents = self.user_agents.clone();
        }
        if config.user_agents.is_empty() {
            config.user_agents = default_user_agents();
        }
        config
    }
}

fn load_config_file(path: &Path) -> Result<ProbeConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("unable to read config file {}", path.display()))?;
    let config: ProbeConfig = ron::from_str(&content)
        .with_context(|| format!("unable to parse config file {}", path.display()))?;
    probe_info!("Loaded probe settings from {:?}", path);
    Ok(config)
}
