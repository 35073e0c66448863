//! # sitesearch-client
//!
//! Query construction and the search engine adapter.
//!
//! This crate provides:
//! - [`build_document_query`] / [`build_section_query`] for the two stages
//! - [`SearchBackend`], the call contract the controller depends on
//! - [`ElasticBackend`], an HTTP implementation (`_search` / `_msearch`)
//! - [`MockBackend`], an in-memory implementation for tests and demos
//!
//! # Example
//!
//! ```rust,no_run
//! use sitesearch_client::{build_document_query, ElasticBackend, ElasticConfig, SearchBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = ElasticBackend::new(ElasticConfig::new("http://localhost:9200", "site"))?;
//!     let results = backend.search(&build_document_query("install")).await?;
//!     println!("{} documents", results.total);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod elastic;
pub mod error;
pub mod query;

pub use backend::{MockBackend, SearchBackend};
pub use elastic::{ElasticBackend, ElasticConfig};
pub use error::ClientError;
pub use query::{
    build_document_query, build_section_query, SearchQuery, DOCUMENT_RESULT_LIMIT,
    HIGHLIGHT_POST_TAG, HIGHLIGHT_PRE_TAG,
};
