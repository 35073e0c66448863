//! # sitesearch-render
//!
//! Turns search hits into ordered render units and paints them lazily.
//!
//! ## Core Concepts
//!
//! - **Aggregation**: each document hit becomes one document unit followed by
//!   its section units; the document teaser is picked from its sections
//! - **Render queue**: pending units for the current search, drained eagerly
//!   while the container has empty room and in batches on scroll
//! - **Container**: the scrollable output surface, behind a trait
//! - **Markup**: HTML list items for painted units
//!
//! ## Usage
//!
//! ```rust
//! use sitesearch_render::{aggregate, MemoryContainer, RenderQueue};
//! use sitesearch_types::{DocumentHit, SectionHit};
//!
//! let documents = vec![DocumentHit::new("d1", "Guide", "/guide/")];
//! let batches = vec![vec![SectionHit::new("d1", "Setup", "/guide/#setup", "Install it.")]];
//!
//! let mut queue = RenderQueue::new();
//! queue.replace(1, aggregate(&documents, &batches));
//!
//! let mut container = MemoryContainer::new(480.0, 16.0);
//! assert_eq!(queue.drain_eager(&mut container), 2);
//! ```

pub mod aggregator;
pub mod container;
pub mod markup;
pub mod queue;

pub use aggregator::{aggregate, select_teaser, truncate, ELLIPSIS, SECTION_TEXT_BUDGET};
pub use container::{ContainerMetrics, MemoryContainer, ResultsContainer};
pub use markup::{absolute_link, Escaper, HtmlEscaper, HtmlRenderer};
pub use queue::{DrainPolicy, RenderQueue, LAZY_BATCH, SLACK};
