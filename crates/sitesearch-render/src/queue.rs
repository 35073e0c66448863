//! Deferred render queue with eager and scroll-driven draining.
//!
//! The queue owns the pending units of the current search only. Installing
//! a new search replaces the whole sequence; units of the previous search
//! that were never painted are dropped.

use std::collections::VecDeque;

use tracing::{debug, trace};

use sitesearch_types::RenderUnit;

use crate::container::ResultsContainer;

/// Margin, in display units, for "visible room left" and "near bottom".
pub const SLACK: f64 = 16.0;

/// Units painted per scroll event.
pub const LAZY_BATCH: usize = 10;

/// Tunables for draining.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrainPolicy {
    pub slack: f64,
    pub lazy_batch: usize,
}

impl Default for DrainPolicy {
    fn default() -> Self {
        Self {
            slack: SLACK,
            lazy_batch: LAZY_BATCH,
        }
    }
}

/// Pending render units for the current search.
#[derive(Debug, Default)]
pub struct RenderQueue {
    pending: VecDeque<RenderUnit>,
    generation: u64,
    policy: DrainPolicy,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DrainPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Install the units of a new search, dropping everything pending.
    ///
    /// Returns the number of stale units discarded.
    pub fn replace(&mut self, generation: u64, units: Vec<RenderUnit>) -> usize {
        let discarded = self.pending.len();
        if discarded > 0 {
            debug!(
                discarded,
                stale_generation = self.generation,
                "Dropping unpainted units"
            );
        }
        self.pending = units.into();
        self.generation = generation;
        discarded
    }

    /// Drop every pending unit without installing new ones.
    pub fn discard(&mut self) -> usize {
        let discarded = self.pending.len();
        self.pending.clear();
        discarded
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn paint_next<C: ResultsContainer + ?Sized>(&mut self, container: &mut C) -> bool {
        match self.pending.pop_front() {
            Some(unit) => {
                trace!(document_id = unit.document_id(), "Painting unit");
                container.append(&unit);
                true
            }
            None => false,
        }
    }

    /// Paint until the content overflows the view by more than the slack.
    ///
    /// Returns the number of units painted.
    pub fn drain_eager<C: ResultsContainer + ?Sized>(&mut self, container: &mut C) -> usize {
        let mut painted = 0;
        while !self.pending.is_empty() && container.metrics().has_room(self.policy.slack) {
            if !self.paint_next(container) {
                break;
            }
            painted += 1;
        }
        debug!(painted, remaining = self.pending.len(), "Eager drain");
        painted
    }

    /// Paint one batch if the container is scrolled near its bottom.
    ///
    /// Returns the number of units painted.
    pub fn drain_on_scroll<C: ResultsContainer + ?Sized>(&mut self, container: &mut C) -> usize {
        if self.pending.is_empty() || !container.metrics().near_bottom(self.policy.slack) {
            return 0;
        }

        let mut painted = 0;
        while painted < self.policy.lazy_batch && self.paint_next(container) {
            painted += 1;
        }
        debug!(painted, remaining = self.pending.len(), "Scroll drain");
        painted
    }
}
