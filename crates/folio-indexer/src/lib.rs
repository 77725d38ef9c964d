//! Folio Indexer
//!
//! This crate provides the tree engine for Folio, including:
//! - A filesystem abstraction with real-disk and in-memory implementations
//! - The `Entry` tree model (documents and folders)
//! - Concurrent tree construction over a task coordinator
//! - Concurrent aggregate queries (counts, word search, document search)

mod error;
pub mod aggregate;
pub mod fs;
pub mod tree;

pub use aggregate::{Aggregator, DocumentPredicate};
pub use error::IndexerError;
pub use fs::{DirChild, EntryKind, FileSystem, LocalFileSystem, MemoryFileSystem};
pub use tree::{Document, Documents, Entry, Folder, TreeBuilder};
