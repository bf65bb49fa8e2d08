//! Model Context Protocol (MCP) implementation.
//!
//! # Architecture
//!
//! - `protocol` - Core MCP types and message definitions
//! - `server` - MCP server implementation
//! - `transport` - Line-delimited stdio transport
//! - `handler` - Tool registry and dispatch
//! - `resources` - Documentation sections published as resources

pub mod handler;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod transport;

pub use handler::McpHandler;
pub use protocol::*;
pub use resources::ResourceRegistry;
pub use server::McpServer;
pub use transport::{StdioTransport, StreamTransport, Transport};
