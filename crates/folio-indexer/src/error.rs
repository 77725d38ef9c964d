//! Indexer error types.

use folio_worker::TaskError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while building or querying a tree.
#[derive(Debug, Error)]
pub enum IndexerError {
    /// The root path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// A file could not be read or a directory could not be listed
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The top-level handle did not complete in time
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// The operation was cancelled before completing
    #[error("Operation cancelled")]
    Cancelled,

    /// A unit of work panicked or the coordinator was misused
    #[error("Task failure: {0}")]
    Task(String),
}

impl IndexerError {
    /// Wrap an I/O error with the path it happened at.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        IndexerError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<TaskError> for IndexerError {
    fn from(e: TaskError) -> Self {
        match e {
            TaskError::Cancelled => IndexerError::Cancelled,
            TaskError::TimedOut(after) => IndexerError::Timeout(after),
            other => IndexerError::Task(other.to_string()),
        }
    }
}
