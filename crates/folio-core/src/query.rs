//! Queries the engine can answer and their results.

use folio_indexer::{Aggregator, Document, DocumentPredicate, Entry, IndexerError};
use folio_worker::TaskCoordinator;
use serde::Serialize;
use std::sync::Arc;

/// An aggregate query over a built tree.
#[derive(Debug, Clone)]
pub enum QueryKind {
    /// Number of documents
    DocumentCount,

    /// Number of entries, folders and the root included
    EntryCount,

    /// Total number of lines across documents
    LineCount,

    /// Whole-word, case-insensitive occurrences of a word
    WordCount(String),

    /// Documents accepted by a predicate, in listing order
    Find(DocumentPredicate),
}

impl QueryKind {
    /// Human-readable description, used in logs.
    pub fn describe(&self) -> String {
        match self {
            QueryKind::DocumentCount => "document count".to_string(),
            QueryKind::EntryCount => "entry count".to_string(),
            QueryKind::LineCount => "line count".to_string(),
            QueryKind::WordCount(word) => format!("word count of {word:?}"),
            QueryKind::Find(predicate) => format!("documents {}", predicate.label()),
        }
    }

    /// Answer the query by composing the aggregator's handles.
    pub(crate) async fn evaluate<C: TaskCoordinator>(
        self,
        aggregator: Aggregator<C>,
        root: Arc<Entry>,
    ) -> Result<QueryResult, IndexerError> {
        let result = match self {
            QueryKind::DocumentCount => QueryResult::Count(aggregator.count_documents(&root).await?),
            QueryKind::EntryCount => QueryResult::Count(aggregator.count_entries(&root).await?),
            QueryKind::LineCount => QueryResult::Count(aggregator.count_lines(&root).await?),
            QueryKind::WordCount(word) => {
                QueryResult::Count(aggregator.count_word_matches(&root, &word).await?)
            }
            QueryKind::Find(predicate) => {
                QueryResult::Documents(aggregator.find_documents(&root, predicate).await?)
            }
        };
        Ok(result)
    }
}

/// The answer to a [`QueryKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryResult {
    Count(u64),
    Documents(Vec<Document>),
}

impl QueryResult {
    pub fn as_count(&self) -> Option<u64> {
        match self {
            QueryResult::Count(n) => Some(*n),
            QueryResult::Documents(_) => None,
        }
    }

    pub fn as_documents(&self) -> Option<&[Document]> {
        match self {
            QueryResult::Documents(docs) => Some(docs),
            QueryResult::Count(_) => None,
        }
    }
}
