//! Error types for the search client.

use thiserror::Error;

/// Errors that can occur when querying the search engine.
///
/// Every variant means the query as a whole failed; callers surface them
/// uniformly as a failed search.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Engine answered with a non-success status
    #[error("Engine returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape
    #[error("Failed to decode engine response: {0}")]
    Decode(String),

    /// Engine reported an error for one query of a batch
    #[error("Engine error: {0}")]
    Engine(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}
