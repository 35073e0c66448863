//! Terminal surfaces for the search box.
//!
//! The container counts printed lines and reports row-based geometry so
//! eager and scroll draining behave as they would in a browser viewport of
//! the configured height.

use std::io::Write;

use tracing::warn;

use sitesearch_box::MetaDisplay;
use sitesearch_client::{HIGHLIGHT_POST_TAG, HIGHLIGHT_PRE_TAG};
use sitesearch_render::{absolute_link, ContainerMetrics, HtmlRenderer, ResultsContainer};
use sitesearch_types::{Fragment, RenderUnit, ViewportSettings};

use crate::cli::OutputFormat;

/// Marker printed around highlighted terms in plain output.
const PLAIN_HIGHLIGHT: &str = "*";

fn plain_fragment(fragment: &Fragment) -> String {
    match fragment {
        Fragment::Plain(text) => text.clone(),
        Fragment::Highlighted(markup) => markup
            .replace(HIGHLIGHT_PRE_TAG, PLAIN_HIGHLIGHT)
            .replace(HIGHLIGHT_POST_TAG, PLAIN_HIGHLIGHT),
    }
}

fn plain_teaser(markup: &str) -> String {
    plain_fragment(&Fragment::Highlighted(markup.to_string()))
}

/// Results container that prints to a writer.
pub struct TerminalContainer<W: Write> {
    out: W,
    format: OutputFormat,
    base_url: String,
    renderer: HtmlRenderer,
    viewport: ViewportSettings,
    rows: usize,
    scroll_top: f64,
}

impl<W: Write> TerminalContainer<W> {
    pub fn new(out: W, format: OutputFormat, base_url: &str, viewport: ViewportSettings) -> Self {
        Self {
            out,
            format,
            base_url: base_url.to_string(),
            renderer: HtmlRenderer::new(base_url),
            viewport,
            rows: 0,
            scroll_top: 0.0,
        }
    }

    /// Number of lines printed since the last clear.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Move the view so the last printed row is visible.
    pub fn scroll_to_bottom(&mut self) {
        let content = self.rows as f64 * self.viewport.row_height;
        self.scroll_top = (content - self.viewport.client_height).max(0.0);
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&self, unit: &RenderUnit) -> String {
        if self.format == OutputFormat::Html {
            return self.renderer.render(unit);
        }
        match unit {
            RenderUnit::Document(document) => {
                let mut line = format!(
                    "{}  <{}>",
                    plain_fragment(&document.title),
                    absolute_link(&self.base_url, &document.location)
                );
                if let Some(teaser) = &document.teaser {
                    line.push_str("\n    ");
                    line.push_str(&plain_teaser(teaser));
                }
                line
            }
            RenderUnit::Section(section) => format!(
                "  - {}: {}  <{}>",
                plain_fragment(&section.title),
                plain_fragment(&section.body),
                absolute_link(&self.base_url, &section.location)
            ),
        }
    }
}

impl<W: Write> ResultsContainer for TerminalContainer<W> {
    fn append(&mut self, unit: &RenderUnit) {
        let line = self.line(unit);
        if let Err(e) = writeln!(self.out, "{}", line) {
            warn!(error = %e, "Failed to print result");
        }
        self.rows += line.lines().count().max(1);
    }

    fn clear(&mut self) {
        if self.rows > 0 {
            if let Err(e) = writeln!(self.out) {
                warn!(error = %e, "Failed to print separator");
            }
        }
        self.rows = 0;
        self.scroll_top = 0.0;
    }

    fn metrics(&self) -> ContainerMetrics {
        ContainerMetrics {
            scroll_top: self.scroll_top,
            client_height: self.viewport.client_height,
            scroll_height: self.rows as f64 * self.viewport.row_height,
        }
    }
}

/// Metadata line printed as a bracketed status line.
pub struct TerminalMeta<W: Write> {
    out: W,
    last: String,
}

impl<W: Write> TerminalMeta<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: String::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.last
    }
}

impl<W: Write> MetaDisplay for TerminalMeta<W> {
    fn set_text(&mut self, text: &str) {
        self.last = text.to_string();
        if let Err(e) = writeln!(self.out, "[{}]", text) {
            warn!(error = %e, "Failed to print status");
        }
    }
}
