//! Command-line interface parsing and runtime configuration
//!
//! The launcher invokes the binary once per query with a subcommand and a
//! positional argument. Ambient settings (cache directory, author identity)
//! are resolved here, once, into an explicit `Config` rather than being read
//! from the environment deeper in the stack.

use std::path::PathBuf;

use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;

/// License search and personalization for launcher workflows
#[derive(Parser, Debug)]
#[command(name = "licenser")]
#[command(about = "Search, preview, copy, and personalize open-source licenses")]
#[command(version)]
pub struct Cli {
    /// Directory for cache store files
    ///
    /// Defaults to the platform cache directory, falling back to the system
    /// temp directory when no home directory is available.
    #[arg(long, global = true, env = "LICENSER_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List licenses matching a query as script-filter JSON
    List {
        /// Free-text query; matches key, name, and SPDX id. Empty lists all.
        query: Option<String>,
    },
    /// Print a Markdown document describing one license
    View {
        /// License key (e.g., "mit")
        key: String,
    },
    /// Print the raw license body text
    Copy {
        /// License key (e.g., "mit")
        key: String,
    },
    /// Print the license body with author and year filled in
    Personalize {
        /// License key (e.g., "mit")
        key: String,
        /// Copyright holder name
        #[arg(long, env = "LICENSER_AUTHOR")]
        author: String,
        /// Copyright year; defaults to the current year
        #[arg(long, env = "LICENSER_YEAR")]
        year: Option<String>,
    },
}

/// Settings resolved once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the cache store files
    pub cache_dir: PathBuf,
}

impl Config {
    /// Resolves the configuration from parsed CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        let cache_dir = cli
            .cache_dir
            .clone()
            .or_else(|| {
                ProjectDirs::from("", "", "licenser").map(|dirs| dirs.cache_dir().to_path_buf())
            })
            .unwrap_or_else(|| std::env::temp_dir().join("licenser"));
        Self { cache_dir }
    }

    /// Creates a config rooted at a specific cache directory
    ///
    /// Useful for testing or when a fixed cache location is needed.
    pub fn for_cache_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }
}

/// The current year, used when `personalize` is called without `--year`
pub fn current_year() -> String {
    Utc::now().year().to_string()
}
