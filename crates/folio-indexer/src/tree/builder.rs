//! Concurrent tree construction.

use super::{Document, Entry, Folder};
use crate::fs::{EntryKind, FileSystem};
use crate::IndexerError;
use folio_worker::{Handle, TaskCoordinator};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// Builds an [`Entry`] tree from a root path.
///
/// Every filesystem item becomes one unit of work on the coordinator. File
/// reads and directory listings go through
/// [`submit_blocking`](TaskCoordinator::submit_blocking). A folder lists its
/// children, submits one unit per child, then awaits a single ordered join
/// over them; it never blocks a worker thread while its children run.
pub struct TreeBuilder<C> {
    coordinator: C,
    fs: Arc<dyn FileSystem>,
}

impl<C: TaskCoordinator> TreeBuilder<C> {
    /// Create a new tree builder.
    pub fn new(coordinator: C, fs: Arc<dyn FileSystem>) -> Self {
        Self { coordinator, fs }
    }

    /// Start building the tree rooted at `root`.
    ///
    /// The handle resolves to a folder, or to a document if `root` is a
    /// file, once the whole subtree is built. The first failure anywhere in
    /// the subtree fails the handle and abandons the remaining work.
    pub fn build(&self, root: &Path) -> Handle<Entry, IndexerError> {
        let coordinator = self.coordinator.clone();
        let fs = Arc::clone(&self.fs);
        let root = root.to_path_buf();

        self.coordinator.submit(async move {
            let kind = {
                let fs = Arc::clone(&fs);
                let root = root.clone();
                coordinator.submit_blocking(move || fs.probe(&root)).await?
            };
            let entry = spawn_entry(&coordinator, &fs, root, kind).await?;
            debug!(root = ?entry.path(), "Tree built");
            Ok(entry)
        })
    }
}

fn spawn_entry<C: TaskCoordinator>(
    coordinator: &C,
    fs: &Arc<dyn FileSystem>,
    path: PathBuf,
    kind: EntryKind,
) -> Handle<Entry, IndexerError> {
    let fs = Arc::clone(fs);
    match kind {
        EntryKind::File => coordinator.submit_blocking(move || {
            let document = Document::create(fs.as_ref(), path)?;
            trace!(path = ?document.path(), bytes = document.contents().len(), "Document loaded");
            Ok(Entry::Document(document))
        }),
        EntryKind::Directory => {
            let inner = coordinator.clone();
            coordinator.submit(async move {
                let children = {
                    let fs = Arc::clone(&fs);
                    let path = path.clone();
                    inner.submit_blocking(move || fs.list_children(&path)).await?
                };
                let pending = children
                    .into_iter()
                    .map(|child| spawn_entry(&inner, &fs, child.path, child.kind))
                    .collect();

                let entries: Vec<Arc<Entry>> = inner
                    .when_all(pending)
                    .await?
                    .into_iter()
                    .map(Arc::new)
                    .collect();

                trace!(path = ?path, children = entries.len(), "Folder assembled");
                Ok(Entry::Folder(Folder::new(path, entries)))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;
    use folio_worker::{EventLoop, WorkerPool};

    fn mock_fs() -> Arc<dyn FileSystem> {
        Arc::new(
            MemoryFileSystem::new()
                .with_file("/project/src/main.rs", "fn main() {}")
                .with_file("/project/src/lib.rs", "pub fn add() {}")
                .with_file("/project/README.md", "# Project")
                .with_dir("/project/empty"),
        )
    }

    #[test]
    fn test_build_tree() {
        let pool = WorkerPool::new(4).unwrap();
        let builder = TreeBuilder::new(pool.clone(), mock_fs());
        let root = pool.wait(builder.build(Path::new("/project"))).unwrap();

        assert!(root.is_folder());
        assert_eq!(root.documents().count(), 3);

        let names: Vec<_> = root.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["src", "README.md", "empty"]);
    }

    #[test]
    fn test_build_single_document_root() {
        let event_loop = EventLoop::new().unwrap();
        let builder = TreeBuilder::new(event_loop.clone(), mock_fs());
        let root = event_loop
            .wait(builder.build(Path::new("/project/README.md")))
            .unwrap();

        assert_eq!(root.as_document().unwrap().contents(), "# Project");
    }

    #[test]
    fn test_missing_root() {
        let pool = WorkerPool::new(1).unwrap();
        let builder = TreeBuilder::new(pool.clone(), mock_fs());
        let err = pool.wait(builder.build(Path::new("/nowhere"))).unwrap_err();

        assert!(matches!(err, IndexerError::PathNotFound(_)));
    }

    #[test]
    fn test_empty_folder() {
        let pool = WorkerPool::new(1).unwrap();
        let builder = TreeBuilder::new(pool.clone(), mock_fs());
        let root = pool.wait(builder.build(Path::new("/project/empty"))).unwrap();

        assert!(root.as_folder().unwrap().is_empty());
        assert_eq!(pool.in_flight(), 0);
    }

    #[test]
    fn test_deeply_nested_files() {
        let mut fs = MemoryFileSystem::new();
        let mut path = PathBuf::from("/deep");
        for level in 0..64 {
            path.push(format!("level{level}"));
        }
        fs = fs.with_file(path.join("file.txt"), "bottom");

        let pool = WorkerPool::new(1).unwrap();
        let builder = TreeBuilder::new(pool.clone(), Arc::new(fs));
        let root = pool.wait(builder.build(Path::new("/deep"))).unwrap();

        let bottom: Vec<_> = root.documents().collect();
        assert_eq!(bottom.len(), 1);
        assert_eq!(bottom[0].contents(), "bottom");
    }
}
