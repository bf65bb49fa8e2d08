//! Rails API Search MCP Server
//!
//! A Model Context Protocol (MCP) server that answers keyword queries against
//! locally stored Ruby on Rails API documentation (HTML).
//!
//! # Architecture
//!
//! 1. **Catalog** (`catalog`) - Ordered list of documentation sections
//! 2. **Service Layer** (`service`) - Document search engine and content loading
//! 3. **MCP Layer** (`mcp`) - Protocol implementation, transport handling, resources
//! 4. **Tools Layer** (`tools`) - The `search` tool
//! 5. **HTTP** (`http`) - Optional HTTP transport with Prometheus metrics
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rails_api_search::catalog::SectionCatalog;
//! use rails_api_search::service::SearchService;
//!
//! let service = SearchService::new(Arc::new(SectionCatalog::rails())).unwrap();
//! let html = "<h1>ActiveRecord Basics</h1><p>Active Record is the M in MVC</p>";
//! let response = service.search(html, "active record", Some("activerecord"), 10).unwrap();
//! assert_eq!(response.matches[0].section, "activerecord");
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod mcp;
pub mod metrics;
pub mod service;
pub mod tools;
pub mod types;

pub use error::{Error, Result};

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
