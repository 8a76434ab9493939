//! Error types for n8nctl-api.

use thiserror::Error;

/// Failures talking to the n8n REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure: DNS, connect, TLS, timeout.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    /// The addressed resource does not exist (HTTP 404).
    #[error("not found: {url}")]
    NotFound { url: String },

    /// Any other non-success status.
    #[error("API returned error {status} for {url}: {body}")]
    Status { status: u16, url: String, body: String },

    /// Response body was not the expected JSON shape.
    #[error("invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// A request body could not be serialized.
    #[error("failed to encode request body: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    /// The server handed back a cursor it had already returned.
    #[error("pagination cursor repeated: {cursor}")]
    PaginationCycle { cursor: String },
}

impl ApiError {
    /// `true` for the 404 class, which callers treat as "remote absent".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
