//! Service layer for the Rails API Search server.
//!
//! This module provides the business logic behind the MCP tools and
//! resources: loading documentation and searching it.

pub mod docs;
pub mod search;

pub use docs::{ContentLoader, FsContentLoader};
pub use search::SearchService;
