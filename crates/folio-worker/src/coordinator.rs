//! The coordination interface shared by every backend.

use crate::{EventLoop, Handle, TaskError, WorkerPool};
use futures::future::try_join_all;
use std::future::Future;
use std::time::Duration;

/// Schedules independent units of work and composes their results.
///
/// Recursive code composes handles with [`submit`](Self::submit) and
/// [`when_all`](Self::when_all) and awaits them asynchronously. Only the
/// outermost caller blocks, through [`wait`](Self::wait) or
/// [`wait_timeout`](Self::wait_timeout); calling either from inside a unit
/// fails with [`TaskError::NestedWait`].
pub trait TaskCoordinator: Clone + Send + Sync + 'static {
    /// Short backend name, used in logs.
    fn backend(&self) -> &'static str;

    /// Schedule a unit of work. Never blocks the calling thread.
    fn submit<T, E, F>(&self, work: F) -> Handle<T, E>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static;

    /// Schedule blocking work, such as a filesystem call, on the
    /// backend's blocking threads. Async workers stay free to drive timers
    /// and other units while it runs. A unit aborted before it starts never
    /// runs; one already running finishes and its result is discarded.
    fn submit_blocking<T, E, F>(&self, work: F) -> Handle<T, E>
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static;

    /// Complete once every handle has succeeded, yielding their results in
    /// input order. The first failure completes the combined handle at once
    /// and the remaining handles are dropped, aborting their units.
    fn when_all<T, E>(&self, handles: Vec<Handle<T, E>>) -> Handle<Vec<T>, E>
    where
        T: Send + 'static,
        E: From<TaskError> + Send + 'static,
    {
        self.submit(try_join_all(handles))
    }

    /// Block the calling thread until the handle resolves.
    fn wait<T, E>(&self, handle: Handle<T, E>) -> Result<T, E>
    where
        E: From<TaskError>;

    /// Like [`wait`](Self::wait), but gives up after `timeout` and aborts the
    /// handle's unit.
    fn wait_timeout<T, E>(&self, handle: Handle<T, E>, timeout: Duration) -> Result<T, E>
    where
        E: From<TaskError>;

    /// Number of submitted units that have not finished or been dropped.
    fn in_flight(&self) -> usize;
}

/// Runtime-selected backend.
#[derive(Debug, Clone)]
pub enum Coordinator {
    /// Fixed pool of worker threads
    Pool(WorkerPool),

    /// Single-threaded cooperative scheduler
    EventLoop(EventLoop),
}

impl Coordinator {
    /// Create a worker pool backend with `workers` threads.
    pub fn pool(workers: usize) -> std::io::Result<Self> {
        Ok(Self::Pool(WorkerPool::new(workers)?))
    }

    /// Create an event loop backend.
    pub fn event_loop() -> std::io::Result<Self> {
        Ok(Self::EventLoop(EventLoop::new()?))
    }
}

impl TaskCoordinator for Coordinator {
    fn backend(&self) -> &'static str {
        match self {
            Coordinator::Pool(pool) => pool.backend(),
            Coordinator::EventLoop(event_loop) => event_loop.backend(),
        }
    }

    fn submit<T, E, F>(&self, work: F) -> Handle<T, E>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        match self {
            Coordinator::Pool(pool) => pool.submit(work),
            Coordinator::EventLoop(event_loop) => event_loop.submit(work),
        }
    }

    fn submit_blocking<T, E, F>(&self, work: F) -> Handle<T, E>
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        match self {
            Coordinator::Pool(pool) => pool.submit_blocking(work),
            Coordinator::EventLoop(event_loop) => event_loop.submit_blocking(work),
        }
    }

    fn wait<T, E>(&self, handle: Handle<T, E>) -> Result<T, E>
    where
        E: From<TaskError>,
    {
        match self {
            Coordinator::Pool(pool) => pool.wait(handle),
            Coordinator::EventLoop(event_loop) => event_loop.wait(handle),
        }
    }

    fn wait_timeout<T, E>(&self, handle: Handle<T, E>, timeout: Duration) -> Result<T, E>
    where
        E: From<TaskError>,
    {
        match self {
            Coordinator::Pool(pool) => pool.wait_timeout(handle, timeout),
            Coordinator::EventLoop(event_loop) => event_loop.wait_timeout(handle, timeout),
        }
    }

    fn in_flight(&self) -> usize {
        match self {
            Coordinator::Pool(pool) => pool.in_flight(),
            Coordinator::EventLoop(event_loop) => event_loop.in_flight(),
        }
    }
}
