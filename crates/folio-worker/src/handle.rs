//! Handles to submitted units of work.

use crate::TaskError;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;
use tokio_util::task::AbortOnDropHandle;

/// A pending or completed unit of work.
///
/// Awaiting a handle yields the unit's own `Result`. Dropping a handle, or
/// calling [`Handle::cancel`], aborts the unit; since a unit owns the handles
/// of the units it spawned, cancellation reaches the whole subtree.
pub struct Handle<T, E> {
    inner: AbortOnDropHandle<Result<T, E>>,
    _error: PhantomData<fn() -> E>,
}

impl<T, E> Handle<T, E> {
    pub(crate) fn new(join: JoinHandle<Result<T, E>>) -> Self {
        Self {
            inner: AbortOnDropHandle::new(join),
            _error: PhantomData,
        }
    }

    /// Abort the unit. A unit that has not started yet never starts.
    pub fn cancel(&self) {
        self.inner.abort();
    }

    /// Whether the unit has finished, successfully or not.
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl<T, E> Future for Handle<T, E>
where
    E: From<TaskError>,
{
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(join_err)) => Poll::Ready(Err(TaskError::from(join_err).into())),
        }
    }
}

impl<T, E> fmt::Debug for Handle<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Counts a unit as in flight from submission until its future is dropped,
/// whether it completed or was aborted.
pub(crate) struct InFlightGuard {
    counter: Arc<AtomicUsize>,
}

impl InFlightGuard {
    pub(crate) fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self {
            counter: Arc::clone(counter),
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}
