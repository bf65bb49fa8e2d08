//! Error types for the Rails API Search server.

use thiserror::Error;

use crate::mcp::protocol::error_codes;

/// Result type alias for Rails API Search operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Rails API Search server.
#[derive(Error, Debug)]
pub enum Error {
    // ===== MCP Errors =====
    #[error("MCP protocol error: {0}")]
    McpProtocol(String),

    #[error("Unknown method: {0}")]
    MethodNotFound(String),

    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    #[error("Invalid search parameters: {0}")]
    InvalidToolArguments(String),

    #[error("Invalid resource URI: {0}")]
    InvalidUri(String),

    // ===== Documentation Errors =====
    #[error("Documentation not found for section: {0}")]
    SectionNotFound(String),

    #[error("Failed to search documentation: {0}")]
    Search(String),

    // ===== I/O Errors =====
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ===== HTTP Errors =====
    #[error("HTTP server error: {0}")]
    HttpServer(String),

    // ===== Internal Errors =====
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the error was caused by the caller's request rather than the server.
    pub fn is_invalid_params(&self) -> bool {
        matches!(
            self,
            Self::ToolNotFound(_)
                | Self::InvalidToolArguments(_)
                | Self::InvalidUri(_)
                | Self::SectionNotFound(_)
        )
    }

    /// JSON-RPC error code reported to the client.
    pub fn rpc_code(&self) -> i32 {
        match self {
            Self::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            Self::McpProtocol(_) => error_codes::INVALID_REQUEST,
            e if e.is_invalid_params() => error_codes::INVALID_PARAMS,
            _ => error_codes::INTERNAL_ERROR,
        }
    }
}
