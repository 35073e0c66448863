//! Search backend trait and an in-memory implementation.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use sitesearch_types::{DocumentResults, SectionHit};

use crate::error::ClientError;
use crate::query::SearchQuery;

/// Issues queries against the external full-text engine.
///
/// Implementations perform no caching and no retries: every call is a fresh
/// round trip and any failure fails the whole call.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a stage-1 document query.
    async fn search(&self, query: &SearchQuery) -> Result<DocumentResults, ClientError>;

    /// Run stage-2 section queries as one batch.
    ///
    /// Returns one hit list per input query, in the same order.
    async fn batch_search(
        &self,
        queries: &[SearchQuery],
    ) -> Result<Vec<Vec<SectionHit>>, ClientError>;
}

/// In-memory backend for tests and demos.
///
/// Documents are keyed by query text, sections by parent document id.
#[derive(Default)]
pub struct MockBackend {
    /// Stage-1 results per query text
    pub documents: HashMap<String, DocumentResults>,
    /// Stage-2 hits per document id
    pub sections: HashMap<String, Vec<SectionHit>>,
    /// Query texts whose stage-1 call fails
    pub fail_search: HashSet<String>,
    /// Fail every stage-2 call
    pub fail_batch: bool,
    search_calls: AtomicUsize,
    batch_calls: AtomicUsize,
    batched_queries: Mutex<Vec<SearchQuery>>,
}

impl MockBackend {
    /// Add stage-1 results for a query text.
    pub fn with_documents(mut self, text: impl Into<String>, results: DocumentResults) -> Self {
        self.documents.insert(text.into(), results);
        self
    }

    /// Add stage-2 hits for a document.
    pub fn with_sections(mut self, document_id: impl Into<String>, hits: Vec<SectionHit>) -> Self {
        self.sections.insert(document_id.into(), hits);
        self
    }

    /// Make the stage-1 call for a query text fail.
    pub fn with_search_failure(mut self, text: impl Into<String>) -> Self {
        self.fail_search.insert(text.into());
        self
    }

    /// Make every stage-2 call fail.
    pub fn with_batch_failure(mut self) -> Self {
        self.fail_batch = true;
        self
    }

    /// Number of stage-1 calls issued.
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Number of stage-2 batch calls issued.
    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    /// Every section query received so far, in arrival order.
    pub fn batched_queries(&self) -> Vec<SearchQuery> {
        self.batched_queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SearchBackend for MockBackend {
    async fn search(&self, query: &SearchQuery) -> Result<DocumentResults, ClientError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let text = query.text().unwrap_or_default();
        debug!(text, "Mock stage-1 search");

        if self.fail_search.contains(text) {
            return Err(ClientError::Engine(format!("search for '{}' failed", text)));
        }

        Ok(self.documents.get(text).cloned().unwrap_or_default())
    }

    async fn batch_search(
        &self,
        queries: &[SearchQuery],
    ) -> Result<Vec<Vec<SectionHit>>, ClientError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        debug!(queries = queries.len(), "Mock stage-2 batch");

        if let Ok(mut seen) = self.batched_queries.lock() {
            seen.extend(queries.iter().cloned());
        }

        if self.fail_batch {
            return Err(ClientError::Engine("batch failed".to_string()));
        }

        Ok(queries
            .iter()
            .map(|query| {
                query
                    .scoped_document_id()
                    .and_then(|id| self.sections.get(id))
                    .cloned()
                    .unwrap_or_default()
            })
            .collect())
    }
}
