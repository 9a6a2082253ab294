//! Error types for aimdb

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for aimdb operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Buffer not initialized")]
    Uninitialized,

    #[error("Out of range: {requested} bytes at index {index}, window ends at {end}")]
    OutOfRange {
        index: usize,
        requested: usize,
        end: usize,
    },

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Cannot read {}: {source}", .path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Map an I/O failure on `path` to `FileNotFound` or `FileUnreadable`
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound(path)
        } else {
            Error::FileUnreadable { path, source }
        }
    }
}

/// Result type alias for aimdb operations
pub type Result<T> = std::result::Result<T, Error>;
