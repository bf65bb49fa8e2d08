//! Core type definitions for the Rails API Search server.

pub mod search;

// Re-export commonly used types
pub use search::*;
