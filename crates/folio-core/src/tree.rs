//! A built tree together with when and how fast it was built.

use chrono::{DateTime, Utc};
use folio_indexer::Entry;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// A fully constructed tree, ready for any number of queries.
///
/// Cloning is cheap: the entries are shared, never copied.
#[derive(Debug, Clone, Serialize)]
pub struct Tree {
    /// Path the tree was built from
    root_path: PathBuf,

    /// When construction finished
    built_at: DateTime<Utc>,

    /// Construction time in milliseconds
    build_time_ms: u64,

    /// Root entry
    root: Arc<Entry>,
}

impl Tree {
    pub fn new(root_path: PathBuf, root: Entry, build_time: Duration) -> Self {
        Self {
            root_path,
            built_at: Utc::now(),
            build_time_ms: build_time.as_millis() as u64,
            root: Arc::new(root),
        }
    }

    pub fn root(&self) -> &Arc<Entry> {
        &self.root
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn build_time(&self) -> Duration {
        Duration::from_millis(self.build_time_ms)
    }

    /// Generate a skeleton string representation of the tree.
    pub fn to_skeleton_string(&self) -> String {
        self.root.to_skeleton_string()
    }
}
