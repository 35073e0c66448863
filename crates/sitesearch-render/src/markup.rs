//! HTML fragments for painted render units.
//!
//! Plain text passes through an [`Escaper`]; highlighted fragments come
//! from the engine already marked up and are inserted verbatim.

use sitesearch_types::{Fragment, RenderUnit};

/// Escapes raw document text before it is placed into markup.
pub trait Escaper: Send + Sync {
    fn escape(&self, raw: &str) -> String;
}

/// Escapes the five HTML-significant characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlEscaper;

impl Escaper for HtmlEscaper {
    fn escape(&self, raw: &str) -> String {
        let mut escaped = String::with_capacity(raw.len());
        for c in raw.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#39;"),
                other => escaped.push(other),
            }
        }
        escaped
    }
}

/// Join the site base URL and a result location with exactly one slash.
///
/// Locations that already carry a scheme are returned as-is.
pub fn absolute_link(base_url: &str, location: &str) -> String {
    if location.starts_with("http://") || location.starts_with("https://") {
        return location.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        location.trim_start_matches('/')
    )
}

/// Renders units as list items.
pub struct HtmlRenderer {
    base_url: String,
    escaper: Box<dyn Escaper>,
}

impl HtmlRenderer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_escaper(base_url, Box::new(HtmlEscaper))
    }

    pub fn with_escaper(base_url: impl Into<String>, escaper: Box<dyn Escaper>) -> Self {
        Self {
            base_url: base_url.into(),
            escaper,
        }
    }

    fn text(&self, fragment: &Fragment) -> String {
        match fragment {
            Fragment::Plain(text) => self.escaper.escape(text),
            Fragment::Highlighted(markup) => markup.clone(),
        }
    }

    fn href(&self, location: &str) -> String {
        self.escaper.escape(&absolute_link(&self.base_url, location))
    }

    /// Markup for one unit.
    pub fn render(&self, unit: &RenderUnit) -> String {
        match unit {
            RenderUnit::Document(document) => {
                let teaser = document
                    .teaser
                    .as_ref()
                    .map(|t| format!(r#"<span class="search-teaser">{}</span>"#, t))
                    .unwrap_or_default();
                format!(
                    r#"<li class="search-result"><a href="{}"><span class="search-title">{}</span>{}</a></li>"#,
                    self.href(&document.location),
                    self.text(&document.title),
                    teaser
                )
            }
            RenderUnit::Section(section) => format!(
                r#"<li class="search-section"><a href="{}"><span class="search-title">{}</span><span class="search-teaser">{}</span></a></li>"#,
                self.href(&section.location),
                self.text(&section.title),
                self.text(&section.body)
            ),
        }
    }
}
