//! Error types shared across the sitesearch crates.

use thiserror::Error;

/// Unified error type for configuration loading and validation.
#[derive(Debug, Error)]
pub enum SiteSearchError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
