//! Filesystem backed by `std::fs`.

use super::{DirChild, EntryKind, FileSystem};
use crate::IndexerError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::trace;

/// Reads the real filesystem.
///
/// Listings are sorted by file name so that repeated builds of the same
/// directory produce the same child order. Symbolic links to files are read
/// through; links to directories and dangling links are skipped, which keeps
/// construction from ever revisiting an ancestor. Sockets, FIFOs and device
/// nodes are skipped as well.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem {
    skip_hidden: bool,
}

impl LocalFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip dot-files and dot-directories.
    pub fn skip_hidden(mut self, skip: bool) -> Self {
        self.skip_hidden = skip;
        self
    }

    fn classify(&self, path: &Path, file_type: fs::FileType) -> Option<EntryKind> {
        if file_type.is_dir() {
            return Some(EntryKind::Directory);
        }
        if file_type.is_file() {
            return Some(EntryKind::File);
        }
        if file_type.is_symlink() {
            return match fs::metadata(path) {
                Ok(target) if target.is_file() => Some(EntryKind::File),
                Ok(_) => {
                    trace!(path = ?path, "Skipping symlink to non-file");
                    None
                }
                Err(e) => {
                    trace!(path = ?path, error = %e, "Skipping dangling symlink");
                    None
                }
            };
        }

        trace!(path = ?path, "Skipping special file");
        None
    }
}

impl FileSystem for LocalFileSystem {
    fn probe(&self, path: &Path) -> Result<EntryKind, IndexerError> {
        match fs::metadata(path) {
            Ok(metadata) if metadata.is_dir() => Ok(EntryKind::Directory),
            Ok(_) => Ok(EntryKind::File),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(IndexerError::PathNotFound(path.to_path_buf()))
            }
            Err(e) => Err(IndexerError::io(path, e)),
        }
    }

    fn list_children(&self, path: &Path) -> Result<Vec<DirChild>, IndexerError> {
        let listing = fs::read_dir(path).map_err(|e| IndexerError::io(path, e))?;

        let mut children = Vec::new();
        for item in listing {
            let item = item.map_err(|e| IndexerError::io(path, e))?;
            let child_path = item.path();

            if self.skip_hidden && item.file_name().to_string_lossy().starts_with('.') {
                continue;
            }

            let file_type = item.file_type().map_err(|e| IndexerError::io(&child_path, e))?;
            if let Some(kind) = self.classify(&child_path, file_type) {
                children.push(DirChild::new(child_path, kind));
            }
        }

        children.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Ok(children)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>, IndexerError> {
        fs::read(path).map_err(|e| IndexerError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_probe_missing_path() {
        let temp_dir = tempdir().unwrap();
        let fs = LocalFileSystem::new();

        let err = fs.probe(&temp_dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, IndexerError::PathNotFound(_)));
    }

    #[test]
    fn test_probe_kinds() {
        let temp_dir = tempdir().unwrap();
        File::create(temp_dir.path().join("a.txt")).unwrap();
        let fs = LocalFileSystem::new();

        assert_eq!(fs.probe(temp_dir.path()).unwrap(), EntryKind::Directory);
        assert_eq!(
            fs.probe(&temp_dir.path().join("a.txt")).unwrap(),
            EntryKind::File
        );
    }

    #[test]
    fn test_listing_sorted_by_name() {
        let temp_dir = tempdir().unwrap();
        File::create(temp_dir.path().join("c.txt")).unwrap();
        File::create(temp_dir.path().join("a.txt")).unwrap();
        fs::create_dir(temp_dir.path().join("b")).unwrap();

        let children = LocalFileSystem::new().list_children(temp_dir.path()).unwrap();
        let names: Vec<_> = children
            .iter()
            .map(|c| c.path.file_name().unwrap().to_str().unwrap())
            .collect();

        assert_eq!(names, vec!["a.txt", "b", "c.txt"]);
        assert_eq!(children[1].kind, EntryKind::Directory);
    }

    #[test]
    fn test_skip_hidden() {
        let temp_dir = tempdir().unwrap();
        File::create(temp_dir.path().join("visible.txt")).unwrap();
        File::create(temp_dir.path().join(".hidden.txt")).unwrap();

        let all = LocalFileSystem::new().list_children(temp_dir.path()).unwrap();
        let visible = LocalFileSystem::new()
            .skip_hidden(true)
            .list_children(temp_dir.path())
            .unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(visible.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_symlinks_skipped() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("real")).unwrap();
        fs::write(temp_dir.path().join("real/doc.txt"), "text").unwrap();
        std::os::unix::fs::symlink(temp_dir.path(), temp_dir.path().join("real/loop")).unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("real/doc.txt"),
            temp_dir.path().join("real/alias.txt"),
        )
        .unwrap();

        let children = LocalFileSystem::new()
            .list_children(&temp_dir.path().join("real"))
            .unwrap();
        let names: Vec<_> = children
            .iter()
            .map(|c| c.path.file_name().unwrap().to_str().unwrap())
            .collect();

        assert_eq!(names, vec!["alias.txt", "doc.txt"]);
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let temp_dir = tempdir().unwrap();
        let err = LocalFileSystem::new()
            .read_file(&temp_dir.path().join("gone.txt"))
            .unwrap_err();
        assert!(matches!(err, IndexerError::Io { .. }));
    }
}
