//! Core error types for Folio.

use folio_indexer::IndexerError;
use folio_worker::TaskError;
use thiserror::Error;

/// Errors that can occur in engine operations
#[derive(Debug, Error)]
pub enum CoreError {
    /// Building or querying the tree failed
    #[error(transparent)]
    Indexer(#[from] IndexerError),

    /// Configuration could not be loaded or is invalid
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The coordinator runtime could not be started
    #[error("Failed to start coordinator runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl From<TaskError> for CoreError {
    fn from(e: TaskError) -> Self {
        CoreError::Indexer(e.into())
    }
}

impl CoreError {
    /// The operation ran out of time; retrying may succeed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, CoreError::Indexer(IndexerError::Timeout(_)))
    }

    /// The operation was cancelled before completing.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CoreError::Indexer(IndexerError::Cancelled))
    }

    /// The filesystem could not be read; retrying will not help.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            CoreError::Indexer(IndexerError::Io { .. } | IndexerError::PathNotFound(_))
        )
    }
}
