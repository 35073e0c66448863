//! Error types for the search box controller.

use thiserror::Error;

use sitesearch_client::ClientError;

/// Errors surfaced by search box entry points.
///
/// Each error aborts only the operation that raised it; the box stays usable.
#[derive(Debug, Error)]
pub enum SearchBoxError {
    /// Stage-1 or stage-2 query failed. Nothing was rendered for that search.
    #[error("Query failed: {0}")]
    QueryFailed(#[from] ClientError),

    /// A required handle is missing, detached, or unusable
    #[error("Invalid binding: {0}")]
    InvalidBinding(String),
}
