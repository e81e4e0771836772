use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use sitecheck_core::{RunReport, UrlReport};
use tempfile::NamedTempFile;

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub generated_utc: String,
    pub elapsed_seconds: f64,
    pub max_attempts: u32,
    pub total_successes: u64,
    pub total_attempts: u64,
    pub results: &'a [UrlReport],
}

impl<'a> JsonReport<'a> {
    pub fn new(report: &'a RunReport, generated_utc: String) -> Self {
        Self {
            generated_utc,
            elapsed_seconds: report.elapsed.as_secs_f64(),
            max_attempts: report.max_attempts,
            total_successes: report.total_successes(),
            total_attempts: report.total_attempts(),
            results: &report.results,
        }
    }
}

/// Writes the report next to `path` in a temp file, then renames it into place.
pub fn write_json_report(path: &Path, report: &JsonReport<'_>) -> Result<()> {
    let content = serde_json::to_string_pretty(report).context("unable to serialize report")?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("unable to create report directory {}", dir.display()))?;
    }

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("report directory {} is not writable", dir.display()))?;
    tmp.write_all(content.as_bytes())?;
    tmp.write_all(b"\n")?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("unable to write report to {}", path.display()))?;
    Ok(())
}
