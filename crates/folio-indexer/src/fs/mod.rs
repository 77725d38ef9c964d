//! Filesystem abstraction consumed by the tree builder.
//!
//! The builder only needs three operations: classify the root, list one
//! directory level, and read one file. Both implementations here are
//! synchronous; they run inside coordinator units.

mod local;
mod memory;

pub use local::LocalFileSystem;
pub use memory::MemoryFileSystem;

use crate::IndexerError;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What a filesystem item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One item returned by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirChild {
    /// Full path of the item
    pub path: PathBuf,
    /// File or directory
    pub kind: EntryKind,
}

impl DirChild {
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Source of directory listings and file contents.
pub trait FileSystem: Send + Sync + 'static {
    /// Classify `path`, failing with [`IndexerError::PathNotFound`] if it
    /// does not exist.
    fn probe(&self, path: &Path) -> Result<EntryKind, IndexerError>;

    /// List the immediate children of a directory, in listing order.
    fn list_children(&self, path: &Path) -> Result<Vec<DirChild>, IndexerError>;

    /// Read the full contents of a file.
    fn read_file(&self, path: &Path) -> Result<Vec<u8>, IndexerError>;
}
