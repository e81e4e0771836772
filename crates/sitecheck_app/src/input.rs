use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use probe_logging::probe_info;

use crate::cli::Cli;

/// Collects URLs from piped stdin, then `--url`, then `--input`, in that order.
pub fn gather_urls(cli: &Cli) -> Result<Vec<String>> {
    let mut urls = Vec::new();

    let stdin = io::stdin();
    if !stdin.is_terminal() {
        let mut raw = String::new();
        stdin
            .lock()
            .read_to_string(&mut raw)
            .context("unable to read stdin")?;
        let piped = parse_urls(&raw);
        if !piped.is_empty() {
            probe_info!("{} urls received on stdin", piped.len());
        }
        urls.extend(piped);
    }

    urls.extend(
        cli.urls
            .iter()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .map(ToOwned::to_owned),
    );

    if let Some(path) = &cli.input {
        urls.extend(read_url_file(path)?);
    }

    if urls.is_empty() {
        bail!("no urls given; use --url, --input or pipe them on stdin");
    }
    Ok(urls)
}

pub fn read_url_file(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("unable to read input file {}", path.display()))?;
    Ok(parse_urls(&raw))
}

/// One URL per line; blank lines and `#` comments are skipped.
pub fn parse_urls(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_trims_and_skips_blanks_and_comments() {
        let raw = "  https://a.example \n\n# staging\nhttps://b.example\r\n   \n";
        assert_eq!(
            parse_urls(raw),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn parse_keeps_order_and_duplicates() {
        let raw = "https://b.example\nhttps://a.example\nhttps://b.example\n";
        assert_eq!(
            parse_urls(raw),
            vec!["https://b.example", "https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn reading_missing_file_fails_with_path() {
        let err = read_url_file(Path::new("/nonexistent/urls.txt")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/urls.txt"));
    }

    #[test]
    fn reads_urls_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        fs::write(&path, "https://a.example\n\nhttps://b.example\n").unwrap();
        assert_eq!(read_url_file(&path).unwrap().len(), 2);
    }
}
