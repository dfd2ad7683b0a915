use super::panic_handler::{PanicHandler, TaskPanic};
use super::task::{Job, Task};
use super::worker::{Worker, WorkerId};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::scheduler::{Dispatcher, Priority};
use crate::telemetry::{Metrics, MetricsSnapshot};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// State shared between the pool handle and its worker threads.
pub(crate) struct Shared {
    pub(crate) state: Mutex<PoolState>,
    pub(crate) work_available: Condvar,
    pub(crate) running: AtomicBool,
    pub(crate) metrics: Metrics,
    pub(crate) panic_handler: PanicHandler,
    pub(crate) idle_poll_interval: Duration,
}

/// Everything guarded by the pool lock.
pub(crate) struct PoolState {
    pub(crate) dispatcher: Dispatcher<Job>,
    started: bool,
    workers: Vec<WorkerHandle>,
}

struct WorkerHandle {
    id: WorkerId,
    thread: JoinHandle<()>,
}

/// A fixed number of worker threads serving three priority tiers.
///
/// Workers are spawned on the first accepted submission, not at
/// construction. Within a tier tasks run in submission order; across tiers
/// HIGH is preferred, except that once three tasks have been dispatched
/// since the last forced one and both HIGH and NORMAL have work waiting, the
/// next NORMAL task is forced through.
///
/// ```no_run
/// use tierpool::{FixedPool, Priority};
///
/// let pool = FixedPool::new(4).unwrap();
/// pool.execute(|| println!("urgent"), Priority::High);
/// pool.execute(|| println!("whenever"), Priority::Low);
/// pool.shutdown().unwrap();
/// ```
pub struct FixedPool {
    shared: Arc<Shared>,
    num_threads: usize,
    thread_name_prefix: String,
    stack_size: Option<usize>,
}

impl FixedPool {
    /// Creates a pool that will run `worker_count` threads once work arrives.
    pub fn new(worker_count: usize) -> Result<Self> {
        let config = Config::builder().num_threads(worker_count).build()?;
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let num_threads = config.worker_threads();
        if num_threads == 0 {
            return Err(Error::config("need at least 1 thread"));
        }

        let shared = Arc::new(Shared {
            state: Mutex::new(PoolState {
                dispatcher: Dispatcher::new(config.starvation_threshold),
                started: false,
                workers: Vec::new(),
            }),
            work_available: Condvar::new(),
            running: AtomicBool::new(true),
            metrics: Metrics::new(),
            panic_handler: PanicHandler::new(config.panic_strategy),
            idle_poll_interval: config.idle_poll_interval,
        });

        Ok(Self {
            shared,
            num_threads,
            thread_name_prefix: config.thread_name_prefix,
            stack_size: config.stack_size,
        })
    }

    /// Queues `task` under `priority`.
    ///
    /// Returns `false` without queueing anything once [`stop`](Self::stop)
    /// has been called.
    pub fn submit<T: Task>(&self, task: T, priority: Priority) -> bool {
        self.submit_boxed(Box::new(task), priority)
    }

    pub fn submit_boxed(&self, task: Box<dyn Task>, priority: Priority) -> bool {
        if !self.is_running() {
            return self.reject(priority);
        }

        let job = Job::new(task, priority);
        let tid = job.id;

        {
            let mut state = self.shared.state.lock();

            // re-checked under the lock so a task accepted here is always
            // seen by a worker before that worker decides to exit
            if !self.is_running() {
                drop(state);
                return self.reject(priority);
            }

            if !state.started {
                self.start_workers(&mut state);
            }

            state.dispatcher.push(priority, job);
        }

        self.shared.metrics.record_submitted();
        self.shared.work_available.notify_one();

        tracing::trace!(task = tid.as_u64(), priority = %priority, "task queued");
        true
    }

    /// Convenience wrapper around [`submit`](Self::submit) for closures.
    pub fn execute<F>(&self, f: F, priority: Priority) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(f, priority)
    }

    fn reject(&self, priority: Priority) -> bool {
        self.shared.metrics.record_rejected();
        tracing::debug!(priority = %priority, "submission rejected, pool stopped");
        false
    }

    // called with the pool lock held, exactly once per pool
    fn start_workers(&self, state: &mut PoolState) {
        tracing::info!(workers = self.num_threads, "starting worker threads");

        for id in 0..self.num_threads {
            match self.spawn_worker(id) {
                Ok(thread) => {
                    self.shared.metrics.record_worker_spawned();
                    state.workers.push(WorkerHandle { id, thread });
                }
                Err(e) => {
                    tracing::error!(worker = id, error = %e, "failed to spawn worker");
                }
            }
        }

        // with no workers at all, leave it to the next submission to retry
        state.started = !state.workers.is_empty();
    }

    fn spawn_worker(&self, id: WorkerId) -> Result<JoinHandle<()>> {
        let name = format!("{}-{}", self.thread_name_prefix, id);
        let mut builder = thread::Builder::new().name(name);

        if let Some(stack_size) = self.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let worker = Worker::new(id, self.shared.clone());
        builder
            .spawn(move || worker.run())
            .map_err(|e| Error::executor(format!("spawn failed: {}", e)))
    }

    /// Stops accepting work.
    ///
    /// Does not wait: tasks already queued still run, and workers exit once
    /// the queues are empty. Use [`join`](Self::join) to wait for that.
    pub fn stop(&self) {
        if self.shared.running.swap(false, Ordering::AcqRel) {
            tracing::info!(pending = self.pending(), "pool stopping");
        }

        // taking the lock orders this wake-up after any worker's flag check
        let _state = self.shared.state.lock();
        self.shared.work_available.notify_all();
    }

    /// Blocks until every spawned worker has exited.
    ///
    /// Workers only exit after [`stop`](Self::stop), once the queues drain,
    /// so on a running pool this waits for another thread to stop it.
    pub fn join(&self) -> Result<()> {
        let workers = std::mem::take(&mut self.shared.state.lock().workers);
        let current = thread::current().id();
        let mut result = Ok(());

        for worker in workers {
            // a task dropping or joining its own pool must not join itself
            if worker.thread.thread().id() == current {
                continue;
            }

            if let Err(payload) = worker.thread.join() {
                let panic = TaskPanic::from_payload(payload);
                tracing::error!(worker = worker.id, panic = %panic.message, "worker thread died");
                if result.is_ok() {
                    result = Err(Error::WorkerPanic(panic.message));
                }
            }
        }

        result
    }

    /// [`stop`](Self::stop) followed by [`join`](Self::join).
    pub fn shutdown(&self) -> Result<()> {
        self.stop();
        self.join()
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Number of workers the pool runs once started.
    pub fn worker_count(&self) -> usize {
        self.num_threads
    }

    /// Number of worker threads actually spawned so far.
    pub fn spawned_workers(&self) -> usize {
        self.shared.metrics.snapshot().workers_spawned as usize
    }

    /// Tasks queued and not yet picked up by a worker.
    pub fn pending(&self) -> usize {
        self.shared.state.lock().dispatcher.pending()
    }

    pub fn pending_in(&self, priority: Priority) -> usize {
        self.shared.state.lock().dispatcher.queues().len(priority)
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.shared.metrics.snapshot()
    }
}

impl std::fmt::Debug for FixedPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedPool")
            .field("num_threads", &self.num_threads)
            .field("running", &self.is_running())
            .field("pending", &self.pending())
            .finish()
    }
}

impl Drop for FixedPool {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            tracing::error!(error = %e, "pool shutdown failed");
        }
    }
}
