use sitecheck_core::{CollectError, ConfigError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("unable to build http client: {0}")]
    ClientBuild(String),
    #[error("job queue closed before all urls were submitted")]
    QueueClosed,
    #[error("workers exited after {received} of {expected} results")]
    WorkersExited { received: usize, expected: usize },
    #[error("result collection failed: {0}")]
    Collect(#[from] CollectError),
}
