use std::error::Error as StdError;
use std::fmt::Write;
use std::time::Duration;

use futures_util::StreamExt;
use probe_logging::{probe_debug, probe_trace};
use reqwest::header::{HeaderValue, USER_AGENT};
use sitecheck_core::{FailureKind, ProbeConfig, ProbeOutcome};
use url::Url;

use crate::EngineError;

#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub request_timeout: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(sitecheck_core::DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl From<&ProbeConfig> for ProbeSettings {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            request_timeout: config.request_timeout(),
        }
    }
}

/// Performs exactly one GET against a target and classifies the result.
///
/// Implementations must not retry internally and must be safe to call from
/// many workers at once.
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str, user_agent: &str) -> ProbeOutcome;
}

/// Probes over one shared `reqwest` connection pool. Redirects are not
/// followed; the first response is final.
#[derive(Debug, Clone)]
pub struct ReqwestProber {
    client: reqwest::Client,
}

impl ReqwestProber {
    pub fn new(settings: ProbeSettings) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|err| EngineError::ClientBuild(describe(&err)))?;
        Ok(Self { client })
    }

    fn build_request(&self, url: &str, user_agent: &str) -> Result<reqwest::Request, ProbeOutcome> {
        let parsed = Url::parse(url).map_err(|err| {
            ProbeOutcome::fatal(FailureKind::InvalidUrl, format!("{url}: {err}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProbeOutcome::fatal(
                FailureKind::InvalidUrl,
                format!("{url}: unsupported scheme {}", parsed.scheme()),
            ));
        }
        let agent = HeaderValue::from_str(user_agent).map_err(|err| {
            ProbeOutcome::fatal(FailureKind::RequestBuild, format!("{url}: {err}"))
        })?;

        self.client
            .get(parsed)
            .header(USER_AGENT, agent)
            .build()
            .map_err(|err| {
                ProbeOutcome::fatal(FailureKind::RequestBuild, format!("{url}: {}", describe(&err)))
            })
    }
}

#[async_trait::async_trait]
impl Prober for ReqwestProber {
    async fn probe(&self, url: &str, user_agent: &str) -> ProbeOutcome {
        let request = match self.build_request(url, user_agent) {
            Ok(request) => request,
            Err(outcome) => return outcome,
        };

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(err) => return map_reqwest_error(url, err),
        };

        let status = response.status();
        drain(url, response).await;

        if status.is_success() {
            ProbeOutcome::success(status.as_u16())
        } else {
            ProbeOutcome::failure(FailureKind::HttpStatus(status.as_u16()), url)
        }
    }
}

/// Reads the body to the end so the connection goes back to the pool.
async fn drain(url: &str, response: reqwest::Response) {
    let mut drained = 0usize;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => drained += bytes.len(),
            Err(err) => {
                probe_debug!("body drain for {} stopped early: {}", url, describe(&err));
                return;
            }
        }
    }
    probe_trace!("drained {} body bytes from {}", drained, url);
}

fn map_reqwest_error(url: &str, err: reqwest::Error) -> ProbeOutcome {
    let message = format!("{url}: {}", describe(&err));
    if err.is_builder() {
        return ProbeOutcome::fatal(FailureKind::RequestBuild, message);
    }
    if err.is_timeout() {
        return ProbeOutcome::failure(FailureKind::Timeout, message);
    }
    if err.is_connect() {
        return ProbeOutcome::failure(FailureKind::Connect, message);
    }
    ProbeOutcome::failure(FailureKind::Network, message)
}

/// Flattens an error and its sources into one line.
fn describe(mut err: &(dyn StdError + 'static)) -> String {
    let mut s = err.to_string();
    while let Some(src) = err.source() {
        let _ = write!(s, ": {src}");
        err = src;
    }
    s
}
