//! Error types for covstore
//!
//! This module defines the error types shared across the workspace.
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for covstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for covstore
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (open/read/write/close of a data or sentinel file)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The cross-process lock for a data file could not be obtained
    #[error("lock unavailable for {0}")]
    LockUnavailable(PathBuf),

    /// Configuration resolution error
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
