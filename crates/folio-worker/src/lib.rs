//! Folio Worker
//!
//! Task coordination for Folio:
//! - `Handle`, an abortable future to one unit of work
//! - `TaskCoordinator`, the submit / when_all / wait interface
//! - `WorkerPool`, a fixed pool of worker threads
//! - `EventLoop`, a single-threaded cooperative scheduler

mod coordinator;
mod error;
mod event_loop;
mod handle;
mod pool;
mod runtime;

pub use coordinator::{Coordinator, TaskCoordinator};
pub use error::TaskError;
pub use event_loop::EventLoop;
pub use handle::Handle;
pub use pool::WorkerPool;
