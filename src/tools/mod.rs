//! MCP tool implementations.
//!
//! - `search` - Keyword search over the Rails API documentation

pub mod search;

use std::sync::Arc;

use crate::mcp::handler::McpHandler;
use crate::metrics::Metrics;
use crate::service::{ContentLoader, SearchService};

pub use search::SearchTool;

/// Register all tools with the handler.
pub fn register_all_tools(
    handler: &mut McpHandler,
    search_service: Arc<SearchService>,
    loader: Arc<dyn ContentLoader>,
    metrics: Arc<Metrics>,
    default_limit: usize,
) {
    handler.register(
        SearchTool::new(search_service, loader, metrics).with_default_limit(default_limit),
    );
}
