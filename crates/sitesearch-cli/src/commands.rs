//! Command implementations for the sitesearch CLI.
//!
//! Handles:
//! - query: one search, printed through the terminal container
//! - interactive: stdin lines fed to the box as keyup events
//! - config: print the effective settings

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use sitesearch_box::{SearchBox, SearchBoxError};
use sitesearch_client::{ClientError, ElasticBackend, ElasticConfig, SearchBackend};
use sitesearch_types::Settings;

use crate::cli::{OutputFormat, TargetArgs};
use crate::terminal::{TerminalContainer, TerminalMeta};

/// Search box printing to terminal writers.
pub type TerminalBox<B, W> = SearchBox<B, TerminalContainer<W>, TerminalMeta<W>>;

/// Interactive command that paints the next batch.
pub const MORE_COMMAND: &str = ":more";

/// Interactive command that exits.
pub const QUIT_COMMAND: &str = ":quit";

/// Load settings and apply CLI overrides (highest precedence).
pub fn load_settings(
    config_path: Option<&str>,
    log_level: Option<&str>,
    target: &TargetArgs,
) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;

    if let Some(endpoint) = &target.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if let Some(index) = &target.index {
        settings.index = index.clone();
    }
    if let Some(base_url) = &target.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(level) = log_level {
        settings.log_level = level.to_string();
    }

    settings.validate().context("Invalid configuration")?;
    Ok(settings)
}

/// Install the global tracing subscriber. Logs go to stderr.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Connector that builds the HTTP backend on first focus.
pub fn elastic_connector(
    settings: &Settings,
) -> impl FnMut() -> Result<Arc<ElasticBackend>, ClientError> + Send + 'static {
    let config = ElasticConfig::from_settings(settings);
    move || ElasticBackend::new(config.clone()).map(Arc::new)
}

/// Build a search box over terminal writers.
pub fn build_search_box<B, F, W>(
    connector: F,
    settings: &Settings,
    format: OutputFormat,
    results_out: W,
    meta_out: W,
) -> Result<TerminalBox<B, W>>
where
    B: SearchBackend + ?Sized,
    F: FnMut() -> Result<Arc<B>, ClientError> + Send + 'static,
    W: Write,
{
    let container = TerminalContainer::new(
        results_out,
        format,
        &settings.base_url,
        settings.viewport.clone(),
    );
    let search = SearchBox::builder(connector)
        .container(container)
        .meta(TerminalMeta::new(meta_out))
        .messages(settings.messages.clone())
        .build()
        .context("Failed to set up search box")?;
    Ok(search)
}

/// Run one search. With `all`, scroll until nothing is pending.
///
/// Returns the number of units still pending.
pub async fn run_query<B, W>(search: &mut TerminalBox<B, W>, text: &str, all: bool) -> Result<usize>
where
    B: SearchBackend + ?Sized,
    W: Write,
{
    search.on_focus("").await?;
    let outcome = search
        .on_keyup(text)
        .await
        .with_context(|| format!("Search for '{}' failed", text))?;
    debug!(?outcome, "Query finished");

    if all {
        while !search.state().pending.is_empty() {
            search.container_mut().scroll_to_bottom();
            if search.on_scroll()? == 0 {
                break;
            }
        }
    }
    Ok(search.state().pending.len())
}

/// Feed input lines to the box until EOF or `:quit`.
///
/// A failed search is reported and the loop continues.
/// Returns the number of lines processed.
pub async fn run_interactive<B, W, R>(search: &mut TerminalBox<B, W>, input: R) -> Result<usize>
where
    B: SearchBackend + ?Sized,
    W: Write,
    R: AsyncBufRead + Unpin,
{
    search.on_focus("").await?;

    let mut lines = input.lines();
    let mut processed = 0;
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let line = line.trim_end_matches('\r');
        processed += 1;
        match line {
            QUIT_COMMAND => break,
            MORE_COMMAND => {
                search.container_mut().scroll_to_bottom();
                let painted = search.on_scroll()?;
                debug!(painted, "Scrolled");
            }
            text => match search.on_keyup(text).await {
                Ok(_) => {}
                Err(SearchBoxError::QueryFailed(e)) => {
                    warn!(text, error = %e, "Search failed");
                }
                Err(e) => return Err(e.into()),
            },
        }
    }
    Ok(processed)
}

/// Effective settings as TOML, with the API key masked.
pub fn render_config(settings: &Settings) -> Result<String> {
    let mut shown = settings.clone();
    if shown.api_key.is_some() {
        shown.api_key = Some("********".to_string());
    }
    toml::to_string_pretty(&shown).context("Failed to serialize configuration")
}

/// `sitesearch query`
pub async fn handle_query(
    config_path: Option<&str>,
    log_level: Option<&str>,
    text: &str,
    all: bool,
    format: OutputFormat,
    target: &TargetArgs,
) -> Result<()> {
    let settings = load_settings(config_path, log_level, target)?;
    init_logging(&settings)?;
    info!(endpoint = %settings.endpoint, index = %settings.index, "Running query");

    let mut search = build_search_box(
        elastic_connector(&settings),
        &settings,
        format,
        io::stdout(),
        io::stdout(),
    )?;
    let remaining = run_query(&mut search, text, all).await?;
    if remaining > 0 {
        println!("({} more, rerun with --all to print everything)", remaining);
    }
    Ok(())
}

/// `sitesearch interactive`
pub async fn handle_interactive(
    config_path: Option<&str>,
    log_level: Option<&str>,
    format: OutputFormat,
    target: &TargetArgs,
) -> Result<()> {
    let settings = load_settings(config_path, log_level, target)?;
    init_logging(&settings)?;
    info!(endpoint = %settings.endpoint, index = %settings.index, "Interactive search");

    let mut search = build_search_box(
        elastic_connector(&settings),
        &settings,
        format,
        io::stdout(),
        io::stdout(),
    )?;
    let stdin = BufReader::new(tokio::io::stdin());
    let processed = run_interactive(&mut search, stdin).await?;
    info!(processed, "Input closed");
    Ok(())
}

/// `sitesearch config`
pub fn handle_config(
    config_path: Option<&str>,
    log_level: Option<&str>,
    target: &TargetArgs,
) -> Result<()> {
    let settings = load_settings(config_path, log_level, target)?;
    print!("{}", render_config(&settings)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use sitesearch_client::MockBackend;
    use sitesearch_types::{DocumentHit, DocumentResults, SectionHit, ViewportSettings};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn backend() -> Arc<MockBackend> {
        let hits = (0..5)
            .map(|i| DocumentHit::new(format!("d{}", i), format!("Doc {}", i), format!("/d{}/", i)))
            .collect();
        Arc::new(
            MockBackend::default()
                .with_documents("docs", DocumentResults::from_hits(hits))
                .with_documents(
                    "guide",
                    DocumentResults::from_hits(vec![DocumentHit::new("g", "Guide", "/guide/")]),
                )
                .with_sections(
                    "g",
                    vec![SectionHit::new("g", "Setup", "/guide/#setup", "Install it")],
                )
                .with_search_failure("broken"),
        )
    }

    fn settings(client_height: f64) -> Settings {
        Settings {
            base_url: "https://example.org".to_string(),
            viewport: ViewportSettings {
                client_height,
                row_height: 16.0,
            },
            ..Settings::default()
        }
    }

    fn make_box(
        backend: Arc<MockBackend>,
        client_height: f64,
        buffer: &SharedBuffer,
    ) -> TerminalBox<MockBackend, SharedBuffer> {
        build_search_box(
            move || Ok(Arc::clone(&backend)),
            &settings(client_height),
            OutputFormat::Plain,
            buffer.clone(),
            buffer.clone(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_run_query_prints_results_and_summary() {
        let buffer = SharedBuffer::default();
        let mut search = make_box(backend(), 480.0, &buffer);

        let remaining = run_query(&mut search, "guide", false).await.unwrap();

        assert_eq!(remaining, 0);
        let out = buffer.contents();
        assert!(out.starts_with("[Type to start searching]\n"));
        assert!(out.contains("Guide  <https://example.org/guide/>\n"));
        assert!(out.contains("  - Setup: Install it  <https://example.org/guide/#setup>\n"));
        assert!(out.ends_with("[1 result found]\n"));
    }

    #[tokio::test]
    async fn test_run_query_leaves_overflow_pending() {
        let buffer = SharedBuffer::default();
        // Three rows paint before the content overflows the view by more than the slack
        let mut search = make_box(backend(), 16.0, &buffer);

        let remaining = run_query(&mut search, "docs", false).await.unwrap();

        assert_eq!(search.container().rows(), 3);
        assert_eq!(remaining, 2);
    }

    #[tokio::test]
    async fn test_run_query_all_drains_everything() {
        let buffer = SharedBuffer::default();
        let mut search = make_box(backend(), 16.0, &buffer);

        let remaining = run_query(&mut search, "docs", true).await.unwrap();

        assert_eq!(remaining, 0);
        assert_eq!(search.container().rows(), 5);
        assert!(buffer.contents().contains("Doc 4"));
    }

    #[tokio::test]
    async fn test_run_query_reports_failure() {
        let buffer = SharedBuffer::default();
        let mut search = make_box(backend(), 480.0, &buffer);

        let err = run_query(&mut search, "broken", false).await.unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[tokio::test]
    async fn test_interactive_session() {
        let backend = backend();
        let buffer = SharedBuffer::default();
        let mut search = make_box(Arc::clone(&backend), 16.0, &buffer);

        let input: &[u8] = b"docs\ndocs\n:more\nbroken\n\n:quit\nguide\n";
        let processed = run_interactive(&mut search, input).await.unwrap();

        assert_eq!(processed, 6);
        // Repeated text and input after :quit issue no queries
        assert_eq!(backend.search_calls(), 2);
        let out = buffer.contents();
        assert!(out.contains("[5 results found]"));
        assert!(out.contains("Doc 4"));
        assert!(out.ends_with("[Type to start searching]\n"));
    }

    #[test]
    fn test_render_config_masks_api_key() {
        let settings = Settings {
            api_key: Some("secret-key".to_string()),
            ..Settings::default()
        };

        let rendered = render_config(&settings).unwrap();

        assert!(rendered.contains("endpoint = \"http://localhost:9200\""));
        assert!(rendered.contains("********"));
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("[messages]"));
    }

    #[test]
    fn test_load_settings_applies_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "endpoint = \"http://from-file:9200\"\nindex = \"file-index\"").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let target = TargetArgs {
            index: Some("cli-index".to_string()),
            ..TargetArgs::default()
        };
        let settings = load_settings(Some(&path), Some("debug"), &target).unwrap();

        assert_eq!(settings.endpoint, "http://from-file:9200");
        assert_eq!(settings.index, "cli-index");
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_load_settings_rejects_empty_index_override() {
        let target = TargetArgs {
            index: Some(" ".to_string()),
            ..TargetArgs::default()
        };
        assert!(load_settings(None, None, &target).is_err());
    }
}
