//! In-memory mirror of a directory tree.
//!
//! An [`Entry`] is either a [`Document`] (a file and its text) or a
//! [`Folder`] (a directory and its children). Nodes are immutable once built
//! and children are shared through `Arc`, so a finished tree can be read by
//! any number of concurrent queries without locking.

mod builder;

pub use builder::TreeBuilder;

use crate::fs::FileSystem;
use crate::IndexerError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A node in the tree.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    /// A file and its contents
    Document(Document),

    /// A directory and its children
    Folder(Folder),
}

impl Entry {
    /// Filesystem path of this entry.
    pub fn path(&self) -> &Path {
        match self {
            Entry::Document(doc) => doc.path(),
            Entry::Folder(folder) => folder.path(),
        }
    }

    /// Final path component, or the whole path if it has none.
    pub fn name(&self) -> String {
        display_name(self.path())
    }

    /// Check if this is a document.
    pub fn is_document(&self) -> bool {
        matches!(self, Entry::Document(_))
    }

    /// Check if this is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, Entry::Folder(_))
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Entry::Document(doc) => Some(doc),
            Entry::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Entry::Folder(folder) => Some(folder),
            Entry::Document(_) => None,
        }
    }

    /// Children in listing order; empty for a document.
    pub fn children(&self) -> &[Arc<Entry>] {
        match self {
            Entry::Document(_) => &[],
            Entry::Folder(folder) => folder.entries(),
        }
    }

    /// Sequential depth-first walk over every document, in listing order.
    pub fn documents(&self) -> Documents<'_> {
        Documents { stack: vec![self] }
    }

    /// Render the tree as an indented outline.
    pub fn to_skeleton_string(&self) -> String {
        let mut output = String::new();
        render_skeleton(&mut output, self, "", true, true);
        output
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn render_skeleton(output: &mut String, entry: &Entry, prefix: &str, is_last: bool, is_root: bool) {
    if is_root {
        match entry {
            Entry::Folder(_) => output.push_str(&format!("{}/\n", entry.name())),
            Entry::Document(_) => output.push_str(&format!("{}\n", entry.name())),
        }
    } else {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{}{}{}\n", prefix, connector, entry.name()));
    }

    let children = entry.children();
    let child_prefix = if is_root {
        String::new()
    } else {
        format!("{}{}   ", prefix, if is_last { " " } else { "│" })
    };

    for (i, child) in children.iter().enumerate() {
        render_skeleton(output, child, &child_prefix, i + 1 == children.len(), false);
    }
}

/// A file read into memory.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    path: PathBuf,

    #[serde(skip)]
    contents: Arc<str>,
}

impl Document {
    /// Read the file at `path`. Fails if it cannot be read or is not UTF-8.
    pub fn create(fs: &dyn FileSystem, path: impl Into<PathBuf>) -> Result<Self, IndexerError> {
        let path = path.into();
        let bytes = fs.read_file(&path)?;
        let contents = String::from_utf8(bytes).map_err(|e| {
            IndexerError::io(
                &path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;

        Ok(Self::new(path, contents))
    }

    /// Build a document from text already in memory.
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Arc<str>>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> String {
        display_name(&self.path)
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.contents == other.contents
    }
}

impl Eq for Document {}

/// A directory and its children.
#[derive(Debug, Clone, Serialize)]
pub struct Folder {
    path: PathBuf,
    entries: Vec<Arc<Entry>>,
}

impl Folder {
    /// Assemble a folder from children that have already been built.
    pub fn new(path: impl Into<PathBuf>, entries: Vec<Arc<Entry>>) -> Self {
        Self {
            path: path.into(),
            entries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Children in listing order.
    pub fn entries(&self) -> &[Arc<Entry>] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Iterator returned by [`Entry::documents`].
pub struct Documents<'a> {
    stack: Vec<&'a Entry>,
}

impl<'a> Iterator for Documents<'a> {
    type Item = &'a Document;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(entry) = self.stack.pop() {
            match entry {
                Entry::Document(doc) => return Some(doc),
                Entry::Folder(folder) => {
                    self.stack
                        .extend(folder.entries().iter().rev().map(|child| child.as_ref()));
                }
            }
        }
        None
    }
}
