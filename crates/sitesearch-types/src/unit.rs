//! Render units: one deferred paint action per document or section.
//!
//! Units are plain data. The render queue holds them in order and a
//! container turns each one into output when it is drained.

use serde::{Deserialize, Serialize};

/// Display text that is either plain or already marked up by the engine.
///
/// Plain text must be escaped before insertion into markup; highlighted
/// fragments are inserted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Fragment {
    Plain(String),
    Highlighted(String),
}

impl Fragment {
    /// Pick the highlighted fragment when present, else the plain text.
    pub fn prefer_highlight(highlighted: Option<&str>, plain: &str) -> Self {
        match highlighted {
            Some(fragment) => Fragment::Highlighted(fragment.to_string()),
            None => Fragment::Plain(plain.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Fragment::Plain(text) | Fragment::Highlighted(text) => text,
        }
    }
}

/// Summary line for one document hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUnit {
    /// Id of the document this unit paints
    pub document_id: String,

    /// Display title (highlighted when the engine matched it)
    pub title: Fragment,

    /// Highlighted fragment of the best matching section, if any
    pub teaser: Option<String>,

    /// Site-relative location
    pub location: String,
}

/// One matching section nested under its document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionUnit {
    /// Id of the owning document
    pub document_id: String,

    /// Display title (highlighted when the engine matched it)
    pub title: Fragment,

    /// Highlighted fragment, or the truncated plain text
    pub body: Fragment,

    /// Site-relative location
    pub location: String,
}

/// A deferred paint action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderUnit {
    Document(DocumentUnit),
    Section(SectionUnit),
}

impl RenderUnit {
    /// Id of the document this unit belongs to.
    pub fn document_id(&self) -> &str {
        match self {
            RenderUnit::Document(unit) => &unit.document_id,
            RenderUnit::Section(unit) => &unit.document_id,
        }
    }

    pub fn is_document(&self) -> bool {
        matches!(self, RenderUnit::Document(_))
    }

    pub fn title(&self) -> &Fragment {
        match self {
            RenderUnit::Document(unit) => &unit.title,
            RenderUnit::Section(unit) => &unit.title,
        }
    }
}
