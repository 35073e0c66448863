//! CLI argument parsing for the sitesearch tool.
//!
//! CLI flags override every other configuration source.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Site search from the terminal
///
/// Runs the two-stage document and section search against a search engine
/// and prints results the way the search box paints them.
#[derive(Parser, Debug)]
#[command(name = "sitesearch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default ~/.config/sitesearch/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Engine overrides shared by all commands
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Search engine URL
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Index name
    #[arg(short, long)]
    pub index: Option<String>,

    /// Prefix for absolute result links
    #[arg(long)]
    pub base_url: Option<String>,
}

/// How painted units are printed
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented text lines
    #[default]
    Plain,
    /// HTML list items
    Html,
}

/// Commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one search and print the results
    Query {
        /// Search text
        text: String,

        /// Keep scrolling until every result is printed
        #[arg(short, long)]
        all: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Read search text from stdin, one line per keystroke
    ///
    /// An empty line clears the results, `:more` scrolls, `:quit` exits.
    Interactive {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Print the effective configuration
    Config {
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_query() {
        let cli = Cli::parse_from(["sitesearch", "query", "install guide"]);
        match cli.command {
            Commands::Query {
                text, all, format, ..
            } => {
                assert_eq!(text, "install guide");
                assert!(!all);
                assert_eq!(format, OutputFormat::Plain);
            }
            _ => panic!("Expected Query command"),
        }
    }

    #[test]
    fn test_cli_query_with_overrides() {
        let cli = Cli::parse_from([
            "sitesearch",
            "query",
            "rust",
            "--all",
            "-f",
            "html",
            "-e",
            "http://search:9200",
            "--index",
            "docs",
            "--base-url",
            "https://example.org",
        ]);
        match cli.command {
            Commands::Query {
                all,
                format,
                target,
                ..
            } => {
                assert!(all);
                assert_eq!(format, OutputFormat::Html);
                assert_eq!(target.endpoint.as_deref(), Some("http://search:9200"));
                assert_eq!(target.index.as_deref(), Some("docs"));
                assert_eq!(target.base_url.as_deref(), Some("https://example.org"));
            }
            _ => panic!("Expected Query command"),
        }
    }

    #[test]
    fn test_cli_interactive() {
        let cli = Cli::parse_from(["sitesearch", "interactive"]);
        assert!(matches!(cli.command, Commands::Interactive { .. }));
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from([
            "sitesearch",
            "--config",
            "/etc/sitesearch.toml",
            "config",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.config.as_deref(), Some("/etc/sitesearch.toml"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::Config { .. }));
    }
}
