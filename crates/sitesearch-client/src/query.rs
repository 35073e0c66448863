//! Query construction for the two search stages.
//!
//! Stage 1 matches whole documents; stage 2 matches sections scoped to one
//! parent document. Both boost title matches over body matches and ask the
//! engine for highlighted fragments of `title` and `text`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maximum number of documents requested by the stage-1 query.
pub const DOCUMENT_RESULT_LIMIT: usize = 50;

/// Boost applied to title matches.
pub const TITLE_BOOST: u32 = 5;

/// Boost applied to body text matches.
pub const TEXT_BOOST: u32 = 3;

/// Marker inserted before a highlighted fragment.
pub const HIGHLIGHT_PRE_TAG: &str = "<em>";

/// Marker inserted after a highlighted fragment.
pub const HIGHLIGHT_POST_TAG: &str = "</em>";

/// Field distinguishing whole documents from sections.
pub const PARENT_FIELD: &str = "parent_document";

/// `PARENT_FIELD` value of whole documents.
pub const FULL_DOC: &str = "full_doc";

/// `PARENT_FIELD` value and join type of sections.
pub const SECTION: &str = "section";

/// Value of a `match` clause: bare or with a boost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchValue {
    Plain(String),
    Boosted { query: String, boost: u32 },
}

/// Bool compound clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoolClause {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Clause>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<Clause>,
}

/// The subset of the engine's query DSL the search box speaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    Match(BTreeMap<String, MatchValue>),
    ParentId {
        #[serde(rename = "type")]
        kind: String,
        id: String,
    },
    Bool(BoolClause),
}

impl Clause {
    fn match_value(field: &str, value: &str) -> Self {
        Clause::Match(BTreeMap::from([(
            field.to_string(),
            MatchValue::Plain(value.to_string()),
        )]))
    }

    fn match_boosted(field: &str, text: &str, boost: u32) -> Self {
        Clause::Match(BTreeMap::from([(
            field.to_string(),
            MatchValue::Boosted {
                query: text.to_string(),
                boost,
            },
        )]))
    }

    fn search_text(&self) -> Option<&str> {
        match self {
            Clause::Match(fields) => fields.values().find_map(|value| match value {
                MatchValue::Boosted { query, .. } => Some(query.as_str()),
                MatchValue::Plain(_) => None,
            }),
            Clause::Bool(bool_clause) => bool_clause
                .must
                .iter()
                .chain(bool_clause.should.iter())
                .find_map(Clause::search_text),
            Clause::ParentId { .. } => None,
        }
    }
}

/// Empty per-field highlight options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightField {}

/// Highlight request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub fields: BTreeMap<String, HighlightField>,
    pub pre_tags: Vec<String>,
    pub post_tags: Vec<String>,
}

impl Default for Highlight {
    fn default() -> Self {
        Self {
            fields: BTreeMap::from([
                ("text".to_string(), HighlightField::default()),
                ("title".to_string(), HighlightField::default()),
            ]),
            pre_tags: vec![HIGHLIGHT_PRE_TAG.to_string()],
            post_tags: vec![HIGHLIGHT_POST_TAG.to_string()],
        }
    }
}

/// A complete search request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Stored fields to return
    #[serde(rename = "_source")]
    pub source: Vec<String>,

    /// Result count; omitted to let the engine apply its default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,

    pub query: Clause,

    pub highlight: Highlight,
}

impl SearchQuery {
    /// Free text the query was built from.
    pub fn text(&self) -> Option<&str> {
        self.query.search_text()
    }

    /// Id of the document a section query is scoped to.
    pub fn scoped_document_id(&self) -> Option<&str> {
        let Clause::Bool(bool_clause) = &self.query else {
            return None;
        };
        bool_clause.must.iter().find_map(|clause| match clause {
            Clause::ParentId { id, .. } => Some(id.as_str()),
            _ => None,
        })
    }
}

fn title_or_text(text: &str) -> Clause {
    Clause::Bool(BoolClause {
        must: Vec::new(),
        should: vec![
            Clause::match_boosted("title", text, TITLE_BOOST),
            Clause::match_boosted("text", text, TEXT_BOOST),
        ],
    })
}

/// Build the stage-1 query matching top-level documents.
pub fn build_document_query(text: &str) -> SearchQuery {
    SearchQuery {
        source: vec!["title".to_string(), "location".to_string()],
        size: Some(DOCUMENT_RESULT_LIMIT),
        query: Clause::Bool(BoolClause {
            must: vec![Clause::match_value(PARENT_FIELD, FULL_DOC), title_or_text(text)],
            should: Vec::new(),
        }),
        highlight: Highlight::default(),
    }
}

/// Build the stage-2 query matching sections of one document.
///
/// `size_hint` is the number of highlighted fragments found on the parent
/// hit. Zero leaves the size to the engine.
pub fn build_section_query(text: &str, document_id: &str, size_hint: usize) -> SearchQuery {
    SearchQuery {
        source: vec![
            "title".to_string(),
            "location".to_string(),
            "text".to_string(),
        ],
        size: (size_hint > 0).then_some(size_hint),
        query: Clause::Bool(BoolClause {
            must: vec![
                Clause::match_value(PARENT_FIELD, SECTION),
                Clause::ParentId {
                    kind: SECTION.to_string(),
                    id: document_id.to_string(),
                },
                title_or_text(text),
            ],
            should: Vec::new(),
        }),
        highlight: Highlight::default(),
    }
}
