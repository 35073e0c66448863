//! Sitesearch
//!
//! Two-stage site search from the terminal.
//!
//! # Usage
//!
//! ```bash
//! sitesearch query "install guide" [--all] [--format html]
//! sitesearch interactive
//! sitesearch config
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/sitesearch/config.toml)
//! 3. Environment variables (SITESEARCH_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use sitesearch_cli::{handle_config, handle_interactive, handle_query, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            text,
            all,
            format,
            target,
        } => {
            handle_query(
                cli.config.as_deref(),
                cli.log_level.as_deref(),
                &text,
                all,
                format,
                &target,
            )
            .await?;
        }
        Commands::Interactive { format, target } => {
            handle_interactive(
                cli.config.as_deref(),
                cli.log_level.as_deref(),
                format,
                &target,
            )
            .await?;
        }
        Commands::Config { target } => {
            handle_config(cli.config.as_deref(), cli.log_level.as_deref(), &target)?;
        }
    }

    Ok(())
}
