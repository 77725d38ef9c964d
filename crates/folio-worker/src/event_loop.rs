//! Single-threaded cooperative backend.

use crate::runtime::Scheduler;
use crate::{Handle, TaskCoordinator, TaskError};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Runs every unit on one thread, interleaving them at their await points.
/// Blocking work runs one call at a time on a single helper thread.
///
/// Submitted units make progress only while some caller is blocked in
/// [`wait`](TaskCoordinator::wait) or
/// [`wait_timeout`](TaskCoordinator::wait_timeout).
#[derive(Clone)]
pub struct EventLoop {
    scheduler: Arc<Scheduler>,
}

impl EventLoop {
    pub fn new() -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .max_blocking_threads(1)
            .enable_all()
            .build()?;

        Ok(Self {
            scheduler: Arc::new(Scheduler::new(runtime)),
        })
    }
}

impl TaskCoordinator for EventLoop {
    fn backend(&self) -> &'static str {
        "event_loop"
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

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_interleave_on_one_thread() {
        let event_loop = EventLoop::new().unwrap();
        let handles = (0..8u64)
            .map(|i| {
                event_loop.submit(async move {
                    tokio::time::sleep(Duration::from_millis(8 - i)).await;
                    Ok::<_, TaskError>((i, std::thread::current().id()))
                })
            })
            .collect();

        let results = event_loop.wait(event_loop.when_all(handles)).unwrap();
        let order: Vec<u64> = results.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, (0..8).collect::<Vec<_>>());

        let first_thread = results[0].1;
        assert!(results.iter().all(|(_, thread)| *thread == first_thread));
    }

    #[test]
    fn test_timeout_on_event_loop() {
        let event_loop = EventLoop::new().unwrap();
        let slow = event_loop.submit(async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<_, TaskError>(())
        });

        let result = event_loop.wait_timeout(slow, Duration::from_millis(20));
        assert_eq!(result, Err(TaskError::TimedOut(Duration::from_millis(20))));
    }

    #[test]
    fn test_timeout_bounded_by_one_blocking_call() {
        let event_loop = EventLoop::new().unwrap();
        let handles = (0..10)
            .map(|_| {
                event_loop.submit_blocking(|| {
                    std::thread::sleep(Duration::from_millis(100));
                    Ok::<_, TaskError>(())
                })
            })
            .collect();

        let started = std::time::Instant::now();
        let timeout = Duration::from_millis(30);
        let result = event_loop.wait_timeout(event_loop.when_all(handles), timeout);

        assert_eq!(result, Err(TaskError::TimedOut(timeout)));
        assert!(started.elapsed() < Duration::from_millis(400));
    }
}
