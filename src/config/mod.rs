//! Configuration management for the Rails API Search server.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of matches returned by a search.
pub const DEFAULT_LIMIT: usize = 10;

/// Default file name of the aggregate documentation corpus.
pub const DEFAULT_AGGREGATE_FILE: &str = "rails_api.html";

/// Command-line arguments for the Rails API Search server.
#[derive(Parser, Debug, Clone)]
#[command(name = "rails-api-search")]
#[command(author = "Rails API Search Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server for keyword search over Rails API documentation")]
pub struct Args {
    /// Directory containing the `<section>.html` documentation files
    #[arg(short = 'D', long, default_value = "docs", env = "RAILS_API_SEARCH_DOCS_DIR")]
    pub docs_dir: PathBuf,

    /// File name of the aggregate corpus inside the docs directory
    #[arg(long, default_value = DEFAULT_AGGREGATE_FILE, env = "RAILS_API_SEARCH_AGGREGATE_FILE")]
    pub aggregate_file: String,

    /// Transport mode: stdio or http
    #[arg(short, long, default_value = "stdio", env = "RAILS_API_SEARCH_TRANSPORT")]
    pub transport: Transport,

    /// HTTP port (only for http transport)
    #[arg(short, long, default_value = "3000", env = "RAILS_API_SEARCH_PORT")]
    pub port: u16,

    /// Enable debug logging
    #[arg(short, long, env = "RAILS_API_SEARCH_DEBUG")]
    pub debug: bool,

    /// Result limit used when a search call omits `limit`
    #[arg(long, default_value = "10", env = "RAILS_API_SEARCH_DEFAULT_LIMIT")]
    pub default_limit: usize,

    /// Expose Prometheus metrics (http transport)
    #[arg(long, env = "RAILS_API_SEARCH_METRICS")]
    pub metrics: bool,
}

/// Transport mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Stdio,
    Http,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Documentation directory
    pub docs_dir: PathBuf,
    /// Aggregate corpus file name
    pub aggregate_file: String,
    /// Transport mode
    pub transport: Transport,
    /// HTTP port
    pub port: u16,
    /// Debug mode
    pub debug: bool,
    /// Default search limit
    pub default_limit: usize,
    /// Metrics enabled
    pub metrics: bool,
}

impl Config {
    /// Path of the aggregate documentation corpus.
    pub fn aggregate_path(&self) -> PathBuf {
        self.docs_dir.join(&self.aggregate_file)
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            docs_dir: args.docs_dir,
            aggregate_file: args.aggregate_file,
            transport: args.transport,
            port: args.port,
            debug: args.debug,
            // A zero default would make every call without `limit` invalid.
            default_limit: args.default_limit.max(1),
            metrics: args.metrics,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            aggregate_file: DEFAULT_AGGREGATE_FILE.to_string(),
            transport: Transport::Stdio,
            port: 3000,
            debug: false,
            default_limit: DEFAULT_LIMIT,
            metrics: false,
        }
    }
}
