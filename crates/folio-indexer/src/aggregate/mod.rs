//! Aggregate queries over a built tree.
//!
//! Every query is the same fold: a document is mapped to a partial result,
//! and a folder combines the partial results of its children. The fold fans
//! out one unit per child and fans back in with an ordered join, so results
//! never depend on which unit finishes first. Queries cannot hit I/O errors;
//! their handles fail only if the coordinator cancels or times them out.

pub mod text;

use crate::tree::{Document, Entry, Folder};
use crate::IndexerError;
use folio_worker::{Handle, TaskCoordinator};
use std::fmt;
use std::sync::Arc;

/// Test applied to each document by [`Aggregator::find_documents`].
#[derive(Clone)]
pub struct DocumentPredicate {
    label: String,
    test: Arc<dyn Fn(&Document) -> bool + Send + Sync>,
}

impl DocumentPredicate {
    /// Wrap an arbitrary test.
    pub fn new<F>(label: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Document) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            test: Arc::new(test),
        }
    }

    /// Documents that contain `word` under the word matching rules of
    /// [`text`].
    pub fn containing_word(word: impl Into<String>) -> Self {
        let word = word.into();
        let label = format!("containing word {word:?}");
        Self::new(label, move |doc: &Document| text::contains_word(doc.contents(), &word))
    }

    /// Documents whose file extension equals `ext` (without the dot).
    pub fn with_extension(ext: impl Into<String>) -> Self {
        let ext = ext.into();
        let label = format!("with extension {ext:?}");
        Self::new(label, move |doc: &Document| {
            doc.path()
                .extension()
                .is_some_and(|found| found.to_string_lossy().eq_ignore_ascii_case(&ext))
        })
    }

    pub fn matches(&self, document: &Document) -> bool {
        (self.test)(document)
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for DocumentPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DocumentPredicate").field(&self.label).finish()
    }
}

/// Runs aggregate queries on a coordinator.
#[derive(Debug, Clone)]
pub struct Aggregator<C> {
    coordinator: C,
}

impl<C: TaskCoordinator> Aggregator<C> {
    pub fn new(coordinator: C) -> Self {
        Self { coordinator }
    }

    /// Number of documents in the subtree. An empty folder counts 0.
    pub fn count_documents(&self, root: &Arc<Entry>) -> Handle<u64, IndexerError> {
        self.fold(root, |_| 1, |_, parts| parts.into_iter().sum())
    }

    /// Number of entries in the subtree, the root and every folder included.
    pub fn count_entries(&self, root: &Arc<Entry>) -> Handle<u64, IndexerError> {
        self.fold(root, |_| 1, |_, parts| 1 + parts.into_iter().sum::<u64>())
    }

    /// Total occurrences of `word` across all documents.
    pub fn count_word_matches(&self, root: &Arc<Entry>, word: &str) -> Handle<u64, IndexerError> {
        let word = word.to_string();
        self.fold(
            root,
            move |doc| text::count_word(doc.contents(), &word),
            |_, parts| parts.into_iter().sum(),
        )
    }

    /// Total number of lines across all documents.
    pub fn count_lines(&self, root: &Arc<Entry>) -> Handle<u64, IndexerError> {
        self.fold(
            root,
            |doc| text::count_lines(doc.contents()),
            |_, parts| parts.into_iter().sum(),
        )
    }

    /// Documents accepted by `predicate`, in depth-first listing order.
    pub fn find_documents(
        &self,
        root: &Arc<Entry>,
        predicate: DocumentPredicate,
    ) -> Handle<Vec<Document>, IndexerError> {
        self.fold(
            root,
            move |doc| {
                if predicate.matches(doc) {
                    vec![doc.clone()]
                } else {
                    Vec::new()
                }
            },
            |_, parts| parts.into_iter().flatten().collect(),
        )
    }

    /// Fan a query out over the subtree and combine the results in order.
    pub fn fold<R, L, J>(&self, root: &Arc<Entry>, leaf: L, join: J) -> Handle<R, IndexerError>
    where
        R: Send + 'static,
        L: Fn(&Document) -> R + Send + Sync + 'static,
        J: Fn(&Folder, Vec<R>) -> R + Send + Sync + 'static,
    {
        fold_entry(&self.coordinator, Arc::clone(root), Arc::new(leaf), Arc::new(join))
    }
}

fn fold_entry<C, R, L, J>(
    coordinator: &C,
    entry: Arc<Entry>,
    leaf: Arc<L>,
    join: Arc<J>,
) -> Handle<R, IndexerError>
where
    C: TaskCoordinator,
    R: Send + 'static,
    L: Fn(&Document) -> R + Send + Sync + 'static,
    J: Fn(&Folder, Vec<R>) -> R + Send + Sync + 'static,
{
    let inner = coordinator.clone();
    coordinator.submit(async move {
        match entry.as_ref() {
            Entry::Document(doc) => Ok(leaf(doc)),
            Entry::Folder(folder) => {
                let pending = folder
                    .entries()
                    .iter()
                    .map(|child| {
                        fold_entry(&inner, Arc::clone(child), Arc::clone(&leaf), Arc::clone(&join))
                    })
                    .collect();
                let parts = inner.when_all(pending).await?;
                Ok(join(folder, parts))
            }
        }
    })
}
