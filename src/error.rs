use thiserror::Error;

/// Errors from the video, web-search and publishing providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport failure or timeout
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The publishing provider signalled an error
    #[error("Publish failed: {0}")]
    PublishFailed(String),
}

/// Rejected inbound search input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    #[error("search text is empty")]
    EmptySearch,
}
