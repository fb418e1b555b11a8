use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to an upstream provider.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{context}: {source}")]
    Request {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{context}: upstream returned {status}: {body}")]
    Status {
        context: &'static str,
        status: StatusCode,
        body: String,
    },
    #[error("{context}: {message}")]
    Api {
        context: &'static str,
        message: String,
    },
}
