//! Input and lifecycle controller.
//!
//! A search moves through three steps so that input keeps flowing while a
//! query is in flight:
//!
//! 1. [`SearchBox::accept_input`] decides synchronously whether the text
//!    needs a query and, if so, tags it with a fresh generation id
//! 2. [`PendingSearch::run`] performs the stage-1 and stage-2 round trips
//!    without borrowing the box
//! 3. [`SearchBox::complete`] installs the results, unless a newer search
//!    has started in the meantime
//!
//! [`SearchBox::on_keyup`] and [`SearchBox::on_focus`] chain all three for
//! callers that process one event at a time.

use std::sync::{Arc, Weak};

use tracing::{debug, info, warn};

use sitesearch_client::{build_document_query, build_section_query, ClientError, SearchBackend};
use sitesearch_render::{aggregate, DrainPolicy, RenderQueue, ResultsContainer};
use sitesearch_types::{Messages, RenderUnit};

use crate::binding::{validate_bindings, MetaDisplay};
use crate::error::SearchBoxError;

/// Builds the backend on first focus.
pub type Connector<B> = Box<dyn FnMut() -> Result<Arc<B>, ClientError> + Send>;

/// Coarse lifecycle state of a search box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No focus seen yet; no backend, no scroll handling
    Uninitialized,
    /// Ready for input, nothing in flight
    Idle,
    /// A search has been accepted and has not completed yet
    Querying,
}

/// Per-instance search state.
#[derive(Debug, Default)]
pub struct SearchState {
    /// Flips to true exactly once, on first focus
    pub initialized: bool,
    /// Text of the last accepted input event
    pub last_query_text: String,
    /// Id of the most recently accepted search
    pub generation: u64,
    /// Units of the current search not painted yet
    pub pending: RenderQueue,
}

/// What an input event resolved to, before any network work.
pub enum InputAction<B: SearchBackend + ?Sized> {
    /// First focus: the backend was bound and scroll handling attached
    Initialized,
    /// Event ignored: text unchanged, or keyup before initialization
    Unchanged,
    /// Input emptied: list cleared, placeholder restored
    Cleared,
    /// A query must run
    Search(PendingSearch<B>),
}

/// Outcome of a completed entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    Initialized,
    Unchanged,
    Cleared,
    /// Results were installed and the eager drain ran
    Rendered {
        generation: u64,
        total: u64,
        painted: usize,
        pending: usize,
    },
    /// A newer search started first; the results were dropped
    Stale { generation: u64 },
}

/// Data produced by a successful search.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    /// Count shown in the summary line
    pub total: u64,
    /// Aggregated units in paint order
    pub units: Vec<RenderUnit>,
}

/// Result of running a [`PendingSearch`], tagged with its generation.
#[derive(Debug)]
pub struct SearchCompletion {
    pub generation: u64,
    pub text: String,
    pub result: Result<SearchResults, ClientError>,
    ticket: Arc<u64>,
}

/// An accepted search that has not hit the network yet.
///
/// The box reports [`LifecycleState::Querying`] only while the latest
/// search, or its completion, is still alive. Dropping either one returns
/// the box to idle.
pub struct PendingSearch<B: SearchBackend + ?Sized> {
    generation: u64,
    text: String,
    backend: Arc<B>,
    ticket: Arc<u64>,
}

impl<B: SearchBackend + ?Sized> PendingSearch<B> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Run both query stages.
    ///
    /// The batched section query is skipped when stage 1 returns no hits.
    pub async fn run(self) -> SearchCompletion {
        let result = Self::execute(self.backend.as_ref(), &self.text).await;
        SearchCompletion {
            generation: self.generation,
            text: self.text,
            result,
            ticket: self.ticket,
        }
    }

    async fn execute(backend: &B, text: &str) -> Result<SearchResults, ClientError> {
        let documents = backend.search(&build_document_query(text)).await?;
        // Engines may report a total smaller than the hits they sent back
        let total = documents.total.max(documents.hits.len() as u64);

        if documents.is_empty() {
            debug!(text, "No document hits; skipping section batch");
            return Ok(SearchResults {
                total,
                units: Vec::new(),
            });
        }

        let queries: Vec<_> = documents
            .hits
            .iter()
            .map(|hit| build_section_query(text, &hit.id, hit.highlight_fragments))
            .collect();
        let batches = backend.batch_search(&queries).await?;

        let units = aggregate(&documents.hits, &batches);
        debug!(
            text,
            documents = documents.hits.len(),
            units = units.len(),
            "Search aggregated"
        );
        Ok(SearchResults { total, units })
    }
}

/// Builder for [`SearchBox`].
pub struct SearchBoxBuilder<B: SearchBackend + ?Sized, C, M> {
    connector: Connector<B>,
    container: Option<C>,
    meta: Option<M>,
    messages: Messages,
    policy: DrainPolicy,
}

impl<B, C, M> SearchBoxBuilder<B, C, M>
where
    B: SearchBackend + ?Sized,
    C: ResultsContainer,
    M: MetaDisplay,
{
    pub fn container(mut self, container: C) -> Self {
        self.container = Some(container);
        self
    }

    pub fn meta(mut self, meta: M) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    pub fn policy(mut self, policy: DrainPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validate the handles and create the box.
    ///
    /// The metadata line starts out showing the placeholder.
    pub fn build(self) -> Result<SearchBox<B, C, M>, SearchBoxError> {
        let container = self.container.ok_or_else(|| {
            SearchBoxError::InvalidBinding("results container not provided".to_string())
        })?;
        let mut meta = self.meta.ok_or_else(|| {
            SearchBoxError::InvalidBinding("metadata element not provided".to_string())
        })?;
        self.messages
            .validate()
            .map_err(SearchBoxError::InvalidBinding)?;
        validate_bindings(&container, &meta)?;

        meta.set_text(&self.messages.placeholder);

        Ok(SearchBox {
            connector: self.connector,
            backend: None,
            in_flight: Weak::new(),
            container,
            meta,
            messages: self.messages,
            state: SearchState {
                pending: RenderQueue::with_policy(self.policy),
                ..SearchState::default()
            },
        })
    }
}

/// One search box: input handling, query orchestration and lazy painting.
pub struct SearchBox<B: SearchBackend + ?Sized, C, M> {
    connector: Connector<B>,
    backend: Option<Arc<B>>,
    /// Ticket of the latest accepted search; dead once it completes or is dropped
    in_flight: Weak<u64>,
    container: C,
    meta: M,
    messages: Messages,
    state: SearchState,
}

impl<B, C, M> SearchBox<B, C, M>
where
    B: SearchBackend + ?Sized,
    C: ResultsContainer,
    M: MetaDisplay,
{
    /// Start building a box whose backend is created by `connector`.
    pub fn builder<F>(connector: F) -> SearchBoxBuilder<B, C, M>
    where
        F: FnMut() -> Result<Arc<B>, ClientError> + Send + 'static,
    {
        SearchBoxBuilder {
            connector: Box::new(connector),
            container: None,
            meta: None,
            messages: Messages::default(),
            policy: DrainPolicy::default(),
        }
    }

    pub fn lifecycle(&self) -> LifecycleState {
        if !self.state.initialized {
            LifecycleState::Uninitialized
        } else if self.in_flight.strong_count() > 0 {
            LifecycleState::Querying
        } else {
            LifecycleState::Idle
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    /// Mutable access, e.g. to move the scroll position.
    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    pub fn meta(&self) -> &M {
        &self.meta
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Handle a focus event.
    ///
    /// The first focus only initializes, whatever the text.
    pub async fn on_focus(&mut self, text: &str) -> Result<InputOutcome, SearchBoxError> {
        let action = if self.state.initialized {
            self.accept_input(text)?
        } else {
            self.initialize()?;
            InputAction::Initialized
        };
        self.finish(action).await
    }

    /// Handle a keyup event.
    pub async fn on_keyup(&mut self, text: &str) -> Result<InputOutcome, SearchBoxError> {
        let action = self.accept_input(text)?;
        self.finish(action).await
    }

    /// Handle a scroll event on the results container.
    ///
    /// Returns the number of units painted.
    pub fn on_scroll(&mut self) -> Result<usize, SearchBoxError> {
        validate_bindings(&self.container, &self.meta)?;
        if !self.state.initialized {
            return Ok(0);
        }
        Ok(self.state.pending.drain_on_scroll(&mut self.container))
    }

    async fn finish(&mut self, action: InputAction<B>) -> Result<InputOutcome, SearchBoxError> {
        match action {
            InputAction::Initialized => Ok(InputOutcome::Initialized),
            InputAction::Unchanged => Ok(InputOutcome::Unchanged),
            InputAction::Cleared => Ok(InputOutcome::Cleared),
            InputAction::Search(pending) => {
                let completion = pending.run().await;
                self.complete(completion)
            }
        }
    }

    fn initialize(&mut self) -> Result<(), SearchBoxError> {
        validate_bindings(&self.container, &self.meta)?;
        let backend = (self.connector)().map_err(|e| {
            SearchBoxError::InvalidBinding(format!("search backend unavailable: {}", e))
        })?;
        self.backend = Some(backend);
        self.state.initialized = true;
        info!("Search box initialized");
        Ok(())
    }

    /// Decide what an input event needs, without awaiting anything.
    ///
    /// Non-empty text different from the last accepted text starts a new
    /// generation. Any search still in flight becomes stale.
    pub fn accept_input(&mut self, text: &str) -> Result<InputAction<B>, SearchBoxError> {
        validate_bindings(&self.container, &self.meta)?;

        if !self.state.initialized {
            debug!("Input before initialization ignored");
            return Ok(InputAction::Unchanged);
        }
        if text == self.state.last_query_text {
            return Ok(InputAction::Unchanged);
        }

        self.state.last_query_text = text.to_string();
        self.state.generation += 1;

        if text.is_empty() {
            self.in_flight = Weak::new();
            let discarded = self.state.pending.discard();
            self.container.clear();
            self.meta.set_text(&self.messages.placeholder);
            debug!(discarded, "Input cleared");
            return Ok(InputAction::Cleared);
        }

        let backend = match &self.backend {
            Some(backend) => Arc::clone(backend),
            None => return Err(SearchBoxError::InvalidBinding("search backend not bound".to_string())),
        };

        let ticket = Arc::new(self.state.generation);
        self.in_flight = Arc::downgrade(&ticket);
        debug!(text, generation = self.state.generation, "Search accepted");

        Ok(InputAction::Search(PendingSearch {
            generation: self.state.generation,
            text: text.to_string(),
            backend,
            ticket,
        }))
    }

    /// Install the outcome of a search.
    ///
    /// Completions from an older generation are dropped. On failure the
    /// current list and metadata are left untouched.
    pub fn complete(&mut self, completion: SearchCompletion) -> Result<InputOutcome, SearchBoxError> {
        validate_bindings(&self.container, &self.meta)?;

        let generation = completion.generation;
        if generation != self.state.generation {
            debug!(
                generation,
                current = self.state.generation,
                text = %completion.text,
                "Discarding stale completion"
            );
            return Ok(InputOutcome::Stale { generation });
        }
        self.in_flight = Weak::new();

        let results = match completion.result {
            Ok(results) => results,
            Err(e) => {
                warn!(text = %completion.text, error = %e, "Search failed");
                return Err(SearchBoxError::QueryFailed(e));
            }
        };

        self.container.clear();
        self.state.pending.replace(generation, results.units);
        let painted = self.state.pending.drain_eager(&mut self.container);
        self.meta.set_text(&self.messages.summary(results.total));

        info!(
            text = %completion.text,
            total = results.total,
            painted,
            pending = self.state.pending.len(),
            "Search rendered"
        );

        Ok(InputOutcome::Rendered {
            generation,
            total: results.total,
            painted,
            pending: self.state.pending.len(),
        })
    }
}
