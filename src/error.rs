//! Error types for document loading and emission.
//!
//! Filtering itself is total: dangling pointers, cycles, and non-local
//! references all degrade locally instead of raising. Errors only come
//! from getting a document in or out.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading, serializing, or writing a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse/shape errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("document root must be an object, got {actual}")]
    NotAnObject { actual: String },

    #[error("failed to serialize output: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

impl DocumentError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } | Self::ReadError { .. } | Self::WriteError { .. } => 3,
            #[cfg(feature = "remote")]
            Self::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}
