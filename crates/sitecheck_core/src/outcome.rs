use std::fmt;

use thiserror::Error;

/// Result of a single probe attempt, as classified by the prober.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered with a 2xx status.
    Success { status: u16 },
    /// Non-2xx status or a transport-level error.
    Failure(ProbeError),
    /// The request could not be built; retrying will not help.
    Fatal(ProbeError),
}

impl ProbeOutcome {
    pub fn success(status: u16) -> Self {
        Self::Success { status }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure(ProbeError::new(kind, message))
    }

    pub fn fatal(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Fatal(ProbeError::new(kind, message))
    }

    pub fn error(&self) -> Option<&ProbeError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(err) | Self::Fatal(err) => Some(err),
        }
    }

    /// HTTP status code carried by the outcome, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Success { status } => Some(*status),
            Self::Failure(ProbeError {
                kind: FailureKind::HttpStatus(code),
                ..
            }) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { status } => write!(f, "ok ({status})"),
            Self::Failure(err) => write!(f, "failed: {err}"),
            Self::Fatal(err) => write!(f, "fatal: {err}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} for {message}")]
pub struct ProbeError {
    pub kind: FailureKind,
    pub message: String,
}

impl ProbeError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    RequestBuild,
    HttpStatus(u16),
    Timeout,
    Connect,
    Network,
    /// The prober itself panicked mid-attempt.
    Panicked,
}

impl FailureKind {
    /// Failures raised before any bytes hit the wire.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FailureKind::InvalidUrl | FailureKind::RequestBuild | FailureKind::Panicked
        )
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FailureKind::Timeout | FailureKind::Connect | FailureKind::Network
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::RequestBuild => write!(f, "unable to create request"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Connect => write!(f, "connection failed"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Panicked => write!(f, "prober panicked"),
        }
    }
}
