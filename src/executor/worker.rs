// worker thread loop
use super::pool::Shared;
use super::task::Job;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

pub type WorkerId = usize;

pub(crate) struct Worker {
    pub id: WorkerId,
    shared: Arc<Shared>,
}

impl Worker {
    pub fn new(id: WorkerId, shared: Arc<Shared>) -> Self {
        Self { id, shared }
    }

    // main loop: runs until the pool is stopped and every queue is empty
    pub fn run(&self) {
        tracing::debug!(worker = self.id, "worker started");

        while let Some(job) = self.next_job() {
            self.execute_job(job);
        }

        tracing::debug!(worker = self.id, "worker exiting");
    }

    fn next_job(&self) -> Option<Job> {
        let mut state = self.shared.state.lock();

        loop {
            if let Some(dispatch) = state.dispatcher.next() {
                if dispatch.forced {
                    self.shared.metrics.record_forced_dispatch();
                }
                tracing::trace!(
                    worker = self.id,
                    task = dispatch.item.id.as_u64(),
                    priority = %dispatch.tier,
                    forced = dispatch.forced,
                    "dispatched task"
                );
                return Some(dispatch.item);
            }

            // the flag is read under the lock that stop() takes before
            // notifying, so a stop cannot slip in between here and the wait
            if !self.shared.running.load(Ordering::Acquire) {
                return None;
            }

            self.shared
                .work_available
                .wait_for(&mut state, self.shared.idle_poll_interval);
        }
    }

    fn execute_job(&self, job: Job) {
        let tid = job.id;
        let waited = job.enqueue_time.elapsed();
        let start = Instant::now();

        let result = self.shared.panic_handler.execute(|| job.execute());

        let duration_ns = start.elapsed().as_nanos() as u64;

        if result.is_err() {
            // already reported by the panic handler according to its strategy
            tracing::trace!(worker = self.id, task = tid.as_u64(), "task panicked");
            self.shared.metrics.record_task_panic();
        } else {
            tracing::trace!(
                worker = self.id,
                task = tid.as_u64(),
                waited_us = waited.as_micros() as u64,
                duration_ns,
                "task finished"
            );
        }

        self.shared.metrics.record_task_execution(duration_ns);
    }
}
