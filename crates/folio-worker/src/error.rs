//! Coordinator error types.

use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinError;

/// Errors raised by the coordinator itself, independent of the work it runs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    /// The unit was aborted before it could produce a result
    #[error("Task cancelled")]
    Cancelled,

    /// A top-level wait expired
    #[error("Timed out after {0:?}")]
    TimedOut(Duration),

    /// The unit panicked while running
    #[error("Task panicked: {0}")]
    Panicked(String),

    /// A blocking wait was attempted from inside a running unit
    #[error("Blocking wait called from inside a running task")]
    NestedWait,
}

impl From<JoinError> for TaskError {
    fn from(err: JoinError) -> Self {
        if err.is_cancelled() {
            return TaskError::Cancelled;
        }

        match err.try_into_panic() {
            Ok(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic payload".to_string());
                TaskError::Panicked(message)
            }
            Err(_) => TaskError::Cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TaskError::TimedOut(Duration::from_millis(250));
        assert!(err.to_string().contains("250ms"));
        assert_eq!(TaskError::Cancelled.to_string(), "Task cancelled");
    }

    #[tokio::test]
    async fn test_join_error_conversion_panic() {
        let join = tokio::spawn(async { panic!("boom") });
        let err: TaskError = join.await.unwrap_err().into();
        assert_eq!(err, TaskError::Panicked("boom".to_string()));
    }

    #[tokio::test]
    async fn test_join_error_conversion_cancelled() {
        let join = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        });
        join.abort();
        let err: TaskError = join.await.unwrap_err().into();
        assert_eq!(err, TaskError::Cancelled);
    }
}
