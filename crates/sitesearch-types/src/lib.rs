//! # sitesearch-types
//!
//! Shared domain types for the sitesearch pipeline.
//!
//! This crate defines the data that flows between the other crates:
//! - Hits: document and section hits from the two query stages
//! - Render units: deferred paint actions produced by aggregation
//! - Messages: result-count display strings
//! - Settings: layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use sitesearch_types::{DocumentHit, Messages};
//!
//! let hit = DocumentHit::new("doc-1", "Getting started", "/start/");
//! assert_eq!(hit.highlighted_title, None);
//! assert_eq!(Messages::default().summary(2), "2 results found");
//! ```

pub mod config;
pub mod error;
pub mod hit;
pub mod messages;
pub mod unit;

pub use config::{Settings, ViewportSettings};
pub use error::SiteSearchError;
pub use hit::{DocumentHit, DocumentResults, SectionHit};
pub use messages::{Messages, COUNT_TOKEN};
pub use unit::{DocumentUnit, Fragment, RenderUnit, SectionUnit};
