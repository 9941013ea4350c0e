use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {method} {url}: {source}")]
    Transport {
        method: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request timed out after {0} s")]
    Timeout(u64),
    #[error("{message} ({status})")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("invalid backend configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequencerError {
    #[error("invalid workflow request: {0}")]
    InvalidRequest(&'static str),
    #[error("a workflow run is already in flight")]
    InFlight,
}
