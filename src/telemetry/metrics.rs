//! Counters describing what a pool has done so far.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Pool metrics collector
#[derive(Debug)]
pub struct Metrics {
    // Submission counters
    tasks_submitted: AtomicU64,
    tasks_rejected: AtomicU64,

    // Execution counters
    tasks_executed: AtomicU64,
    tasks_panicked: AtomicU64,
    forced_dispatches: AtomicU64,
    busy_time_ns: AtomicU64,

    workers_spawned: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            tasks_submitted: AtomicU64::new(0),
            tasks_rejected: AtomicU64::new(0),
            tasks_executed: AtomicU64::new(0),
            tasks_panicked: AtomicU64::new(0),
            forced_dispatches: AtomicU64::new(0),
            busy_time_ns: AtomicU64::new(0),
            workers_spawned: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_submitted(&self) {
        self.tasks_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.tasks_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a finished task, panicked or not, with how long it ran
    pub fn record_task_execution(&self, duration_ns: u64) {
        self.busy_time_ns.fetch_add(duration_ns, Ordering::Relaxed);
        self.tasks_executed.fetch_add(1, Ordering::Release);
    }

    pub fn record_task_panic(&self) {
        self.tasks_panicked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_forced_dispatch(&self) {
        self.forced_dispatches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_worker_spawned(&self) {
        self.workers_spawned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime: self.start_time.elapsed(),
            tasks_submitted: self.tasks_submitted.load(Ordering::Relaxed),
            tasks_rejected: self.tasks_rejected.load(Ordering::Relaxed),
            tasks_executed: self.tasks_executed.load(Ordering::Acquire),
            tasks_panicked: self.tasks_panicked.load(Ordering::Relaxed),
            forced_dispatches: self.forced_dispatches.load(Ordering::Relaxed),
            busy_time_ns: self.busy_time_ns.load(Ordering::Relaxed),
            workers_spawned: self.workers_spawned.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`Metrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub uptime: Duration,
    pub tasks_submitted: u64,
    pub tasks_rejected: u64,
    /// Includes tasks that panicked.
    pub tasks_executed: u64,
    pub tasks_panicked: u64,
    pub forced_dispatches: u64,
    pub busy_time_ns: u64,
    pub workers_spawned: u64,
}

impl MetricsSnapshot {
    /// Accepted tasks that have not finished running yet.
    pub fn outstanding(&self) -> u64 {
        self.tasks_submitted.saturating_sub(self.tasks_executed)
    }
}
