//! Sitesearch CLI library exports.
//!
//! # Modules
//!
//! - `cli`: Command-line argument parsing with clap
//! - `commands`: Command implementations (query, interactive, config)
//! - `terminal`: Results container and metadata line printing to a terminal

pub mod cli;
pub mod commands;
pub mod terminal;

pub use cli::{Cli, Commands, OutputFormat, TargetArgs};
pub use commands::{
    build_search_box, elastic_connector, handle_config, handle_interactive, handle_query,
    init_logging, load_settings, render_config, run_interactive, run_query, TerminalBox,
};
pub use terminal::{TerminalContainer, TerminalMeta};
