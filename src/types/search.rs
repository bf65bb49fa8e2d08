//! Search request and response types.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_LIMIT;
use crate::error::{Error, Result};

/// Parameters accepted by the `search` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchParams {
    /// Text to look for, matched case-insensitively as a substring
    pub query: String,
    /// Section to restrict the corpus to; `None` searches everything
    #[serde(default)]
    pub section: Option<String>,
    /// Maximum number of matches to return
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            section: None,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Reject queries the engine cannot answer meaningfully.
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(Error::InvalidToolArguments(
                "query must be a non-empty string".to_string(),
            ));
        }
        if self.limit == 0 {
            return Err(Error::InvalidToolArguments(
                "limit must be a positive integer".to_string(),
            ));
        }
        if matches!(self.section.as_deref(), Some(s) if s.trim().is_empty()) {
            return Err(Error::InvalidToolArguments(
                "section must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// A single matching element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// First heading of the enclosing section, or "Untitled Section"
    pub title: String,
    /// Whitespace-collapsed text of the matching element
    pub content: String,
    /// `#id` anchor of the element, empty when it has no id
    pub path: String,
    /// Section the match was attributed to
    pub section: String,
    /// Query length over content length
    pub relevance: f64,
}

/// Ranked result of a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub matches: Vec<SearchMatch>,
    pub total: usize,
    pub query: String,
    pub section: Option<String>,
    pub timestamp: DateTime<Local>,
}

impl SearchResponse {
    pub fn new(query: impl Into<String>, section: Option<String>, matches: Vec<SearchMatch>) -> Self {
        Self {
            total: matches.len(),
            matches,
            query: query.into(),
            section,
            timestamp: Local::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
