//! Task representation and execution.

use crate::scheduler::Priority;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Global task ID counter
static TASK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// A unit of work the pool can run.
///
/// Implemented for every `FnOnce() + Send + 'static` closure, so most callers
/// never implement it by hand. A task is consumed by running it.
pub trait Task: Send + 'static {
    fn run(self: Box<Self>);
}

impl<F> Task for F
where
    F: FnOnce() + Send + 'static,
{
    fn run(self: Box<Self>) {
        (*self)()
    }
}

/// Unique identifier for a submitted task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    fn next() -> Self {
        TaskId(TASK_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// A submitted task as it sits in the queues
pub(crate) struct Job {
    pub(crate) id: TaskId,
    pub(crate) task: Box<dyn Task>,
    pub(crate) priority: Priority,
    pub(crate) enqueue_time: Instant,
}

impl Job {
    pub fn new(task: Box<dyn Task>, priority: Priority) -> Self {
        Job {
            id: TaskId::next(),
            task,
            priority,
            enqueue_time: Instant::now(),
        }
    }

    /// Execute the task
    pub fn execute(self) {
        self.task.run();
    }
}

impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("enqueue_time", &self.enqueue_time)
            .finish()
    }
}
