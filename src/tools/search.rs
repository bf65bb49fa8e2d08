//! Search tool - keyword search over the Rails API documentation.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

use crate::catalog::ALL_SECTIONS;
use crate::config::DEFAULT_LIMIT;
use crate::error::{Error, Result};
use crate::mcp::handler::{parse_arguments, success_result, ToolHandler};
use crate::mcp::protocol::{Tool, ToolResult};
use crate::metrics::Metrics;
use crate::service::{ContentLoader, SearchService};
use crate::types::SearchParams;

/// The `search` tool.
pub struct SearchTool {
    search: Arc<SearchService>,
    loader: Arc<dyn ContentLoader>,
    metrics: Arc<Metrics>,
    default_limit: usize,
}

impl SearchTool {
    pub fn new(
        search: Arc<SearchService>,
        loader: Arc<dyn ContentLoader>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            search,
            loader,
            metrics,
            default_limit: DEFAULT_LIMIT,
        }
    }

    /// Limit applied when the caller omits `limit`.
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    fn parse_params(&self, mut args: HashMap<String, Value>) -> Result<SearchParams> {
        if !args.contains_key("limit") {
            args.insert("limit".to_string(), Value::from(self.default_limit));
        }
        let mut params: SearchParams = parse_arguments(args)?;
        params.validate()?;

        // Identifiers are lowercase; `all` is the aggregate corpus, same as no section.
        params.section = params
            .section
            .map(|s| s.to_lowercase())
            .filter(|s| s != ALL_SECTIONS);
        if let Some(section) = params.section.as_deref() {
            if !self.search.catalog().contains(section) {
                return Err(Error::SectionNotFound(section.to_string()));
            }
        }
        Ok(params)
    }
}

#[async_trait]
impl ToolHandler for SearchTool {
    fn definition(&self) -> Tool {
        Tool {
            name: "search".to_string(),
            description: "Search the Rails API documentation. Matches the query case-insensitively against headings, paragraphs, containers and code spans, and returns the matches ranked by relevance together with the documentation section each belongs to.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Text to search for (plain substring, case-insensitive)"
                    },
                    "section": {
                        "type": ["string", "null"],
                        "description": "Optional section identifier (e.g. 'activerecord') to restrict the search; omit to search all documentation"
                    },
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "default": self.default_limit,
                        "description": "Maximum number of matches to return"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, args: HashMap<String, Value>) -> Result<ToolResult> {
        self.metrics.inc_searches();
        let params = self.parse_params(args)?;
        info!(
            "Searching {:?} for {:?} (limit {})",
            params.section.as_deref().unwrap_or(ALL_SECTIONS),
            params.query,
            params.limit
        );

        let content = self.loader.load(params.section.as_deref()).await?;
        let response = self
            .search
            .search(&content, &params.query, params.section.as_deref(), params.limit)
            .map_err(|e| {
                error!("Search error: {}", e);
                e
            })?;

        self.metrics.add_matches(response.total as u64);
        Ok(success_result(serde_json::to_string_pretty(&response)?))
    }
}
