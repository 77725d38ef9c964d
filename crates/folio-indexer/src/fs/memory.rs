//! In-memory filesystem for tests and simulations.

use super::{DirChild, EntryKind, FileSystem};
use crate::IndexerError;
use std::collections::{HashMap, HashSet};
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug)]
enum Node {
    Directory(Vec<PathBuf>),
    File(Vec<u8>),
}

/// A filesystem held entirely in memory.
///
/// Children are listed in insertion order. Parent directories are created on
/// demand. Individual paths can be made to fail, and every read can be slowed
/// down by a fixed delay that blocks the calling thread the way real I/O
/// would.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    nodes: HashMap<PathBuf, Node>,
    failing: HashSet<PathBuf>,
    read_delay: Option<Duration>,
    reads: AtomicUsize,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty directory.
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.insert(path.into(), Node::Directory(Vec::new()));
        self
    }

    /// Add a file with the given contents.
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path.into(), Node::File(contents.into()));
        self
    }

    /// Make reading (for files) or listing (for directories) `path` fail
    /// with a permission error.
    pub fn with_failure(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing.insert(path.into());
        self
    }

    /// Block every file read for `delay`.
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    /// Number of file reads attempted so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn insert(&mut self, path: PathBuf, node: Node) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            let parent = parent.to_path_buf();
            self.ensure_dir(&parent);
            if let Some(Node::Directory(children)) = self.nodes.get_mut(&parent) {
                if !children.contains(&path) {
                    children.push(path.clone());
                }
            }
        }

        let keep_existing = matches!(
            (self.nodes.get(&path), &node),
            (Some(Node::Directory(_)), Node::Directory(_))
        );
        if !keep_existing {
            self.nodes.insert(path, node);
        }
    }

    fn ensure_dir(&mut self, path: &Path) {
        if !self.nodes.contains_key(path) {
            self.insert(path.to_path_buf(), Node::Directory(Vec::new()));
        }
    }

    fn denied(path: &Path) -> IndexerError {
        IndexerError::io(path, Error::new(ErrorKind::PermissionDenied, "permission denied"))
    }

    fn kind_of(&self, path: &Path) -> Option<EntryKind> {
        self.nodes.get(path).map(|node| match node {
            Node::Directory(_) => EntryKind::Directory,
            Node::File(_) => EntryKind::File,
        })
    }
}

impl FileSystem for MemoryFileSystem {
    fn probe(&self, path: &Path) -> Result<EntryKind, IndexerError> {
        self.kind_of(path)
            .ok_or_else(|| IndexerError::PathNotFound(path.to_path_buf()))
    }

    fn list_children(&self, path: &Path) -> Result<Vec<DirChild>, IndexerError> {
        if self.failing.contains(path) {
            return Err(Self::denied(path));
        }

        match self.nodes.get(path) {
            Some(Node::Directory(children)) => Ok(children
                .iter()
                .filter_map(|child| self.kind_of(child).map(|kind| DirChild::new(child, kind)))
                .collect()),
            Some(Node::File(_)) => Err(IndexerError::io(
                path,
                Error::new(ErrorKind::Other, "not a directory"),
            )),
            None => Err(IndexerError::io(
                path,
                Error::new(ErrorKind::NotFound, "no such directory"),
            )),
        }
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>, IndexerError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.read_delay {
            std::thread::sleep(delay);
        }

        if self.failing.contains(path) {
            return Err(Self::denied(path));
        }

        match self.nodes.get(path) {
            Some(Node::File(contents)) => Ok(contents.clone()),
            Some(Node::Directory(_)) => Err(IndexerError::io(
                path,
                Error::new(ErrorKind::Other, "is a directory"),
            )),
            None => Err(IndexerError::io(
                path,
                Error::new(ErrorKind::NotFound, "no such file"),
            )),
        }
    }
}
