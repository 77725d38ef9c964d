//! Engine entry points: build a tree, query it, or both in one call.

use crate::{Backend, CoreError, EngineConfig, EngineMetrics, QueryKind, QueryResult, Tree};
use folio_indexer::{Aggregator, FileSystem, IndexerError, LocalFileSystem, TreeBuilder};
use folio_worker::{Coordinator, Handle, TaskCoordinator};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds trees and answers queries on one coordinator.
///
/// Methods returning a [`Handle`] only schedule work. The blocking methods
/// (`build_tree`, `run_query`, `build_and_query`) are meant for the
/// outermost caller; they wait under the engine's timeout and fail with
/// `Timeout` when it expires, abandoning all in-flight work.
pub struct Engine<C = Coordinator> {
    coordinator: C,
    fs: Arc<dyn FileSystem>,
    timeout: Duration,
    metrics: Arc<EngineMetrics>,
}

impl Engine<Coordinator> {
    /// Create an engine on the local filesystem as configured.
    pub fn from_config(config: &EngineConfig) -> Result<Self, CoreError> {
        config.validate()?;

        let coordinator = match config.backend {
            Backend::Pool => Coordinator::pool(config.worker_threads),
            Backend::EventLoop => Coordinator::event_loop(),
        }
        .map_err(CoreError::Runtime)?;

        let fs = LocalFileSystem::new().skip_hidden(config.skip_hidden);

        info!(
            backend = coordinator.backend(),
            workers = config.worker_threads,
            timeout_ms = config.timeout_ms,
            "Engine ready"
        );

        Ok(Self::new(coordinator, Arc::new(fs)).with_timeout(config.timeout()))
    }
}

impl<C: TaskCoordinator> Engine<C> {
    pub fn new(coordinator: C, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            coordinator,
            fs,
            timeout: DEFAULT_TIMEOUT,
            metrics: Arc::new(EngineMetrics::new()),
        }
    }

    /// Replace the timeout used by the blocking entry points.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn coordinator(&self) -> &C {
        &self.coordinator
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    /// Schedule construction of the tree rooted at `root`.
    pub fn build(&self, root: &Path) -> Handle<Tree, IndexerError> {
        let started = Instant::now();
        let building = TreeBuilder::new(self.coordinator.clone(), Arc::clone(&self.fs)).build(root);
        let root_path = root.to_path_buf();

        self.coordinator.submit(async move {
            let entry = building.await?;
            Ok(Tree::new(root_path, entry, started.elapsed()))
        })
    }

    /// Schedule a query against an already built tree.
    pub fn query(&self, tree: &Tree, query: &QueryKind) -> Handle<QueryResult, IndexerError> {
        let aggregator = Aggregator::new(self.coordinator.clone());
        self.coordinator
            .submit(query.clone().evaluate(aggregator, Arc::clone(tree.root())))
    }

    /// Build the tree rooted at `root` and wait for it.
    pub fn build_tree(&self, root: &Path) -> Result<Tree, CoreError> {
        let tree = self.finish(self.build(root), self.timeout)?;
        self.metrics.record_tree_built();
        debug!(
            root = ?tree.root_path(),
            build_ms = tree.build_time().as_millis() as u64,
            "Tree ready"
        );
        Ok(tree)
    }

    /// Run `query` against `tree` and wait for the result.
    pub fn run_query(&self, tree: &Tree, query: &QueryKind) -> Result<QueryResult, CoreError> {
        let result = self.finish(self.query(tree, query), self.timeout)?;
        self.metrics.record_query();
        Ok(result)
    }

    /// Build the tree rooted at `root`, answer `query`, and return the
    /// result, all under the engine's timeout.
    pub fn build_and_query(&self, root: &Path, query: QueryKind) -> Result<QueryResult, CoreError> {
        self.build_and_query_within(root, query, self.timeout)
    }

    /// Same as [`build_and_query`](Self::build_and_query) with an explicit
    /// timeout.
    pub fn build_and_query_within(
        &self,
        root: &Path,
        query: QueryKind,
        timeout: Duration,
    ) -> Result<QueryResult, CoreError> {
        debug!(root = ?root, query = %query.describe(), "Build and query");

        let building = self.build(root);
        let aggregator = Aggregator::new(self.coordinator.clone());
        let answering = self.coordinator.submit(async move {
            let tree = building.await?;
            query.evaluate(aggregator, Arc::clone(tree.root())).await
        });

        let result = self.finish(answering, timeout)?;
        self.metrics.record_tree_built();
        self.metrics.record_query();
        Ok(result)
    }

    fn finish<T>(&self, handle: Handle<T, IndexerError>, timeout: Duration) -> Result<T, CoreError> {
        let started = Instant::now();
        let result = self.coordinator.wait_timeout(handle, timeout);
        self.metrics.record_operation(started.elapsed());

        result.map_err(|e| {
            let timed_out = matches!(e, IndexerError::Timeout(_));
            self.metrics.record_failure(timed_out);
            warn!(error = %e, in_flight = self.coordinator.in_flight(), "Engine operation failed");
            CoreError::from(e)
        })
    }
}

/// Build the tree at `root` with the default configuration and answer
/// `query` within `timeout`.
pub fn build_and_query(
    root: impl AsRef<Path>,
    query: QueryKind,
    timeout: Duration,
) -> Result<QueryResult, CoreError> {
    let engine = Engine::from_config(&EngineConfig::default())?;
    engine.build_and_query_within(root.as_ref(), query, timeout)
}
