//! # sitesearch-box
//!
//! The search box controller: initialization on first focus, re-entry
//! suppression for repeated input, two-stage query orchestration, stale
//! result detection and the result-count summary line.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use sitesearch_box::{InputOutcome, MemoryMeta, SearchBox};
//! use sitesearch_client::MockBackend;
//! use sitesearch_render::MemoryContainer;
//! use sitesearch_types::{DocumentHit, DocumentResults};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), sitesearch_box::SearchBoxError> {
//! let backend = Arc::new(MockBackend::default().with_documents(
//!     "guide",
//!     DocumentResults::from_hits(vec![DocumentHit::new("d1", "Guide", "/guide/")]),
//! ));
//!
//! let mut search = SearchBox::builder(move || Ok(Arc::clone(&backend)))
//!     .container(MemoryContainer::new(480.0, 16.0))
//!     .meta(MemoryMeta::default())
//!     .build()?;
//!
//! search.on_focus("").await?;
//! let outcome = search.on_keyup("guide").await?;
//! assert!(matches!(outcome, InputOutcome::Rendered { total: 1, .. }));
//! assert_eq!(search.meta().text, "1 result found");
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod controller;
pub mod error;

pub use binding::{validate_bindings, MemoryMeta, MetaDisplay};
pub use controller::{
    Connector, InputAction, InputOutcome, LifecycleState, PendingSearch, SearchBox,
    SearchBoxBuilder, SearchCompletion, SearchResults, SearchState,
};
pub use error::SearchBoxError;
