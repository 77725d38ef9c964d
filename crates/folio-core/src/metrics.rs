//! Operation counters for the engine.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Atomic counters updated by every top-level engine operation.
pub struct EngineMetrics {
    /// Trees built successfully
    pub trees_built: AtomicU64,
    /// Queries answered successfully
    pub queries_total: AtomicU64,
    /// Operations that failed for any reason
    pub failures: AtomicU64,
    /// Operations that failed by timing out
    pub timeouts: AtomicU64,
    /// Sum of all operation latencies in microseconds
    pub latency_us: AtomicU64,
    /// Number of operations measured
    pub operations: AtomicU64,
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self {
            trees_built: AtomicU64::new(0),
            queries_total: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            timeouts: AtomicU64::new(0),
            latency_us: AtomicU64::new(0),
            operations: AtomicU64::new(0),
        }
    }

    /// Record the latency of one finished operation.
    pub fn record_operation(&self, latency: Duration) {
        self.operations.fetch_add(1, Ordering::Relaxed);
        self.latency_us
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_tree_built(&self) {
        self.trees_built.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_query(&self) {
        self.queries_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self, timed_out: bool) {
        self.failures.fetch_add(1, Ordering::Relaxed);
        if timed_out {
            self.timeouts.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Mean operation latency in milliseconds.
    pub fn average_latency_ms(&self) -> f64 {
        let operations = self.operations.load(Ordering::Relaxed);
        if operations == 0 {
            0.0
        } else {
            self.latency_us.load(Ordering::Relaxed) as f64 / operations as f64 / 1000.0
        }
    }
}
