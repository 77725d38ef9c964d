//! Runtime ownership shared by the tokio-backed coordinators.

use crate::handle::InFlightGuard;
use crate::{Handle, TaskError};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{trace, warn};

pub(crate) struct Scheduler {
    runtime: Option<Runtime>,
    spawner: tokio::runtime::Handle,
    in_flight: Arc<AtomicUsize>,
}

impl Scheduler {
    pub(crate) fn new(runtime: Runtime) -> Self {
        Self {
            spawner: runtime.handle().clone(),
            runtime: Some(runtime),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn submit<T, E, F>(&self, work: F) -> Handle<T, E>
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let guard = InFlightGuard::enter(&self.in_flight);
        let unit = async move {
            let _guard = guard;
            work.await
        };

        Handle::new(self.spawner.spawn(unit))
    }

    pub(crate) fn submit_blocking<T, E, F>(&self, work: F) -> Handle<T, E>
    where
        F: FnOnce() -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let guard = InFlightGuard::enter(&self.in_flight);
        Handle::new(self.spawner.spawn_blocking(move || {
            let _guard = guard;
            work()
        }))
    }

    pub(crate) fn wait<T, E>(&self, handle: Handle<T, E>) -> Result<T, E>
    where
        E: From<TaskError>,
    {
        let runtime = self.blocking_runtime()?;
        runtime.block_on(handle)
    }

    pub(crate) fn wait_timeout<T, E>(&self, handle: Handle<T, E>, timeout: Duration) -> Result<T, E>
    where
        E: From<TaskError>,
    {
        let runtime = self.blocking_runtime()?;
        runtime.block_on(async move {
            match tokio::time::timeout(timeout, handle).await {
                Ok(result) => result,
                Err(_) => {
                    trace!(?timeout, "Top-level wait expired");
                    Err(TaskError::TimedOut(timeout).into())
                }
            }
        })
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn blocking_runtime(&self) -> Result<&Runtime, TaskError> {
        if tokio::runtime::Handle::try_current().is_ok() {
            warn!("Blocking wait attempted from inside a running task");
            return Err(TaskError::NestedWait);
        }
        self.runtime.as_ref().ok_or(TaskError::Cancelled)
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        // The last reference may be released on a worker thread, where a
        // blocking shutdown would panic.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
