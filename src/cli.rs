//! Command-line interface definitions for the feed generator.
//!
//! This module defines the CLI arguments and options using the `clap` crate.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Which documents a run produces.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// One JSON feed merging every selected source.
    Combined,
    /// An RSS and a JSON feed per selected source.
    PerSource,
}

/// Command-line arguments for the feed generator.
///
/// # Examples
///
/// ```sh
/// # Combined JSON feed from every source into ./docs
/// master_rss
///
/// # RSS + JSON for PAP only
/// master_rss --output feeds --source pap --mode per-source
///
/// # Custom source table
/// master_rss --config sources.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory, created if missing
    #[arg(short, long, default_value = "docs")]
    pub output: PathBuf,

    /// Source key to fetch, or "all"
    #[arg(short, long, default_value = crate::config::ALL_SOURCES)]
    pub source: String,

    /// Output mode
    #[arg(short, long, value_enum, default_value_t = Mode::Combined)]
    pub mode: Mode,

    /// Optional YAML file overriding the built-in sources and settings
    #[arg(short, long, env = "MASTER_RSS_CONFIG")]
    pub config: Option<PathBuf>,
}
