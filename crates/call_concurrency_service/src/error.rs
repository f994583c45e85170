use call_concurrency_core::ValidationError;
use thiserror::Error;

/// Failures talking to the dataset or result endpoints.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response status {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("{0}")]
    Unavailable(String),
}

/// Anything that aborts a run. Nothing is retried.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to build http client: {0}")]
    ClientSetup(#[source] AdapterError),

    #[error("failed to fetch call records: {0}")]
    Fetch(#[source] AdapterError),

    #[error("failed to submit results: {0}")]
    Submit(#[source] AdapterError),

    #[error("call records rejected: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to export results: {0}")]
    Export(#[from] std::io::Error),

    #[error("failed to serialize results: {0}")]
    Serialization(#[from] serde_json::Error),
}
