//! Fixed-size worker pool backend.

use crate::runtime::Scheduler;
use crate::{Handle, TaskCoordinator, TaskError};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Runs units on a fixed number of worker threads.
///
/// At most `workers` units execute at once no matter how many are submitted;
/// the rest wait in the run queue. Blocking work gets its own `workers`
/// threads, so a pool saturated by file reads still honors timeouts.
#[derive(Clone)]
pub struct WorkerPool {
    scheduler: Arc<Scheduler>,
    workers: usize,
}

impl WorkerPool {
    /// Start a pool with `workers` threads (at least one).
    pub fn new(workers: usize) -> std::io::Result<Self> {
        let workers = workers.max(1);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(workers)
            .max_blocking_threads(workers)
            .thread_name("folio-worker")
            .enable_all()
            .build()?;

        debug!(workers, "Worker pool started");

        Ok(Self {
            scheduler: Arc::new(Scheduler::new(runtime)),
            workers,
        })
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl TaskCoordinator for WorkerPool {
    fn backend(&self) -> &'static str {
        "pool"
    }

    fn submit<T, E, F>(&self, work: F) -> Handle<T, E>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        self.scheduler.submit(work)
    }

    fn submit_blocking<T, E, F>(&self, work: F) -> Handle<T, E>
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        self.scheduler.submit_blocking(work)
    }

    fn wait<T, E>(&self, handle: Handle<T, E>) -> Result<T, E>
    where
        E: From<TaskError>,
    {
        self.scheduler.wait(handle)
    }

    fn wait_timeout<T, E>(&self, handle: Handle<T, E>, timeout: Duration) -> Result<T, E>
    where
        E: From<TaskError>,
    {
        self.scheduler.wait_timeout(handle, timeout)
    }

    fn in_flight(&self) -> usize {
        self.scheduler.in_flight()
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}
