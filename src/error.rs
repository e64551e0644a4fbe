//! Error types for dockv
//!
//! Provides a unified error type for all operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using DocError
pub type Result<T> = std::result::Result<T, DocError>;

/// Unified error type for dockv operations
#[derive(Debug, Error)]
pub enum DocError {
    // -------------------------------------------------------------------------
    // Initialization Errors (fatal, the engine cannot start)
    // -------------------------------------------------------------------------
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Index log corruption at offset {offset}: {reason}")]
    IndexCorruption { offset: u64, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Read Path Errors
    // -------------------------------------------------------------------------
    #[error("Short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    #[error(
        "Value at offset {offset} with length {length} runs past storage log end ({storage_size})"
    )]
    ValueOutOfBounds {
        offset: u64,
        length: u64,
        storage_size: u64,
    },

    // -------------------------------------------------------------------------
    // Value Codec Errors
    // -------------------------------------------------------------------------
    #[error("Malformed value: {0}")]
    MalformedValue(String),
}

impl DocError {
    /// Whether this error can only come out of `Engine::open`
    pub fn is_initialization(&self) -> bool {
        matches!(
            self,
            DocError::Open { .. } | DocError::IndexCorruption { .. } | DocError::Config(_)
        )
    }
}
