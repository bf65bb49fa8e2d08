//! MCP Resources Support
//!
//! Publish every catalog section, plus the aggregate corpus, as a
//! `rails-api://<section>` resource.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::{SectionCatalog, ALL_SECTIONS};
use crate::error::{Error, Result};
use crate::service::ContentLoader;

/// URI scheme of documentation resources.
pub const RESOURCE_SCHEME: &str = "rails-api://";

const HTML_MIME_TYPE: &str = "text/html";

/// Extract the section identifier from a `rails-api://` URI.
///
/// Returns `None` for the aggregate corpus (`rails-api://all`).
pub fn section_from_uri(uri: &str) -> Result<Option<String>> {
    let rest = uri
        .strip_prefix(RESOURCE_SCHEME)
        .ok_or_else(|| Error::InvalidUri(format!("expected {}<section>, got {}", RESOURCE_SCHEME, uri)))?;
    let section = percent_decode_str(rest.trim_end_matches('/'))
        .decode_utf8_lossy()
        .to_lowercase();

    match section.as_str() {
        "" => Err(Error::InvalidUri(format!("missing section in {}", uri))),
        ALL_SECTIONS => Ok(None),
        _ => Ok(Some(section)),
    }
}

/// Build the URI of a section resource.
pub fn section_uri(section: &str) -> String {
    format!("{}{}", RESOURCE_SCHEME, section)
}

/// A resource exposed by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub uri: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// Resource contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Result of resources/list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResourcesResult {
    pub resources: Vec<Resource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Result of resources/read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContents>,
}

/// Resource registry backed by the section catalog.
pub struct ResourceRegistry {
    catalog: Arc<SectionCatalog>,
    loader: Arc<dyn ContentLoader>,
}

impl ResourceRegistry {
    pub fn new(catalog: Arc<SectionCatalog>, loader: Arc<dyn ContentLoader>) -> Self {
        Self { catalog, loader }
    }

    /// One resource per catalog section, followed by the aggregate corpus.
    pub fn list(&self) -> ListResourcesResult {
        let mut resources: Vec<Resource> = self
            .catalog
            .entries()
            .iter()
            .map(|entry| Resource {
                uri: section_uri(&entry.id),
                name: format!("Rails API Documentation - {}", entry.display_name),
                description: Some(format!(
                    "Ruby on Rails {} API documentation",
                    entry.display_name
                )),
                mime_type: Some(HTML_MIME_TYPE.to_string()),
            })
            .collect();

        resources.push(Resource {
            uri: section_uri(ALL_SECTIONS),
            name: "Rails API Documentation - All".to_string(),
            description: Some("Complete Ruby on Rails API documentation".to_string()),
            mime_type: Some(HTML_MIME_TYPE.to_string()),
        });

        ListResourcesResult {
            resources,
            next_cursor: None,
        }
    }

    /// Read the HTML behind a `rails-api://` URI.
    pub async fn read(&self, uri: &str) -> Result<ReadResourceResult> {
        let section = section_from_uri(uri)?;
        let text = self.loader.load(section.as_deref()).await?;

        Ok(ReadResourceResult {
            contents: vec![ResourceContents {
                uri: uri.to_string(),
                mime_type: Some(HTML_MIME_TYPE.to_string()),
                text: Some(text),
            }],
        })
    }
}
