//! Storage error types.

use std::path::PathBuf;

/// Errors from the JSON file store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing a collection file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A collection file is not valid JSON for its record type
    #[error("corrupt collection {path}: {message}")]
    Corrupt { path: PathBuf, message: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
