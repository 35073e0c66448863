//! Search hits returned by the two query stages.
//!
//! Stage 1 yields one [`DocumentHit`] per matching top-level document.
//! Stage 2 yields [`SectionHit`]s, each pointing back at its parent
//! document by id.

use serde::{Deserialize, Serialize};

/// A whole-document hit from the stage-1 query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHit {
    /// Engine document id
    pub id: String,

    /// Plain document title
    pub title: String,

    /// Site-relative location of the document
    pub location: String,

    /// Title fragment with highlight markers, if the title matched
    #[serde(default)]
    pub highlighted_title: Option<String>,

    /// Body fragment with highlight markers, if the body matched
    #[serde(default)]
    pub highlighted_text: Option<String>,

    /// Number of highlighted fragments the engine returned for this hit.
    /// Used as the size hint for the scoped section query.
    #[serde(default)]
    pub highlight_fragments: usize,
}

impl DocumentHit {
    /// Create a hit with no highlighting.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            location: location.into(),
            highlighted_title: None,
            highlighted_text: None,
            highlight_fragments: 0,
        }
    }

    pub fn with_highlighted_title(mut self, fragment: impl Into<String>) -> Self {
        self.highlighted_title = Some(fragment.into());
        self
    }

    pub fn with_highlighted_text(mut self, fragment: impl Into<String>) -> Self {
        self.highlighted_text = Some(fragment.into());
        self
    }

    pub fn with_highlight_fragments(mut self, count: usize) -> Self {
        self.highlight_fragments = count;
        self
    }
}

/// A sub-document hit from the stage-2 query.
///
/// `document_id` is a back-reference to the owning [`DocumentHit`]; the
/// section never owns or embeds its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionHit {
    /// Id of the parent document
    pub document_id: String,

    /// Plain section title
    pub title: String,

    /// Site-relative location, usually with a fragment anchor
    pub location: String,

    /// Plain section text
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub highlighted_title: Option<String>,

    #[serde(default)]
    pub highlighted_text: Option<String>,
}

impl SectionHit {
    /// Create a section hit with no highlighting.
    pub fn new(
        document_id: impl Into<String>,
        title: impl Into<String>,
        location: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            title: title.into(),
            location: location.into(),
            text: text.into(),
            highlighted_title: None,
            highlighted_text: None,
        }
    }

    pub fn with_highlighted_title(mut self, fragment: impl Into<String>) -> Self {
        self.highlighted_title = Some(fragment.into());
        self
    }

    pub fn with_highlighted_text(mut self, fragment: impl Into<String>) -> Self {
        self.highlighted_text = Some(fragment.into());
        self
    }
}

/// Stage-1 response: ordered hits plus the engine's total match count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentResults {
    /// Hits in index relevance order
    pub hits: Vec<DocumentHit>,

    /// Total matches reported by the engine (may exceed `hits.len()`)
    pub total: u64,
}

impl DocumentResults {
    /// Build results whose total equals the number of hits.
    pub fn from_hits(hits: Vec<DocumentHit>) -> Self {
        let total = hits.len() as u64;
        Self { hits, total }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}
