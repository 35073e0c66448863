//! Merge stage-1 document hits with their stage-2 section batches.
//!
//! Output order is the document order from stage 1; each document's unit is
//! followed directly by its sections in stage-2 order.

use tracing::debug;

use sitesearch_types::{DocumentHit, DocumentUnit, Fragment, RenderUnit, SectionHit, SectionUnit};

/// Character budget for plain section text.
pub const SECTION_TEXT_BUDGET: usize = 200;

/// Suffix appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Shorten `text` to at most `budget` characters.
///
/// Cuts at the last space at or before the budget. Without one, or when the
/// only space leads the text, cuts at the budget itself. Text within budget
/// is returned unchanged.
pub fn truncate(text: &str, budget: usize) -> String {
    let Some((cut, at_cut)) = text.char_indices().nth(budget) else {
        return text.to_string();
    };

    let window_end = cut + at_cut.len_utf8();
    let end = match text[..window_end].rfind(' ') {
        Some(0) | None => cut,
        Some(space) => space,
    };

    let mut shortened = String::with_capacity(end + ELLIPSIS.len());
    shortened.push_str(&text[..end]);
    shortened.push_str(ELLIPSIS);
    shortened
}

/// Pick the teaser for a document from its section batch.
///
/// The first section whose plain title equals the document title decides:
/// its highlighted text is the teaser, and if it has none there is no
/// teaser. Later sections with the same title are ignored.
pub fn select_teaser<'a>(document: &DocumentHit, sections: &'a [SectionHit]) -> Option<&'a str> {
    sections
        .iter()
        .find(|section| section.title == document.title)
        .and_then(|section| section.highlighted_text.as_deref())
}

fn section_unit(section: &SectionHit) -> SectionUnit {
    let body = match &section.highlighted_text {
        Some(fragment) => Fragment::Highlighted(fragment.clone()),
        None => Fragment::Plain(truncate(&section.text, SECTION_TEXT_BUDGET)),
    };

    SectionUnit {
        document_id: section.document_id.clone(),
        title: Fragment::prefer_highlight(section.highlighted_title.as_deref(), &section.title),
        body,
        location: section.location.clone(),
    }
}

/// Build the ordered render units for one search.
///
/// `batches[i]` holds the sections of `documents[i]`. A missing batch is
/// treated as empty; every document still gets its own unit.
pub fn aggregate(documents: &[DocumentHit], batches: &[Vec<SectionHit>]) -> Vec<RenderUnit> {
    let section_count: usize = batches.iter().map(Vec::len).sum();
    let mut units = Vec::with_capacity(documents.len() + section_count);

    for (i, document) in documents.iter().enumerate() {
        let sections = batches.get(i).map(Vec::as_slice).unwrap_or_default();

        units.push(RenderUnit::Document(DocumentUnit {
            document_id: document.id.clone(),
            title: Fragment::prefer_highlight(document.highlighted_title.as_deref(), &document.title),
            teaser: select_teaser(document, sections).map(str::to_string),
            location: document.location.clone(),
        }));

        units.extend(sections.iter().map(|s| RenderUnit::Section(section_unit(s))));
    }

    debug!(
        documents = documents.len(),
        units = units.len(),
        "Aggregated render units"
    );
    units
}
