//! Message writer example
//!
//! Queues a few hundred printing tasks across the three tiers, stops the
//! pool, shows that a late submission is refused, then waits for the queue
//! to drain. Run with `RUST_LOG=tierpool=debug` to see the pool's own events.

use std::thread;
use std::time::Duration;
use tierpool::prelude::*;

struct MessageWriterTask {
    message: String,
}

impl MessageWriterTask {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Task for MessageWriterTask {
    fn run(self: Box<Self>) {
        println!("{}", self.message);
        thread::sleep(Duration::from_millis(100));
    }
}

fn main() -> tierpool::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let pool = FixedPool::new(5)?;

    for _ in 0..100 {
        pool.submit(MessageWriterTask::new("High"), Priority::High);
        pool.submit(MessageWriterTask::new("Normal"), Priority::Normal);
        pool.submit(MessageWriterTask::new("Low"), Priority::Low);
    }

    pool.submit(MessageWriterTask::new("Last Low"), Priority::Low);
    pool.stop();

    if !pool.submit(MessageWriterTask::new("Task after stop"), Priority::Low) {
        println!("Task after stop was rejected");
    }

    pool.join()?;

    let metrics = pool.metrics();
    println!(
        "executed {} tasks ({} forced NORMAL dispatches, {} rejected)",
        metrics.tasks_executed, metrics.forced_dispatches, metrics.tasks_rejected
    );

    Ok(())
}
