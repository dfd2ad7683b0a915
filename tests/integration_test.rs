use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::{Duration, Instant};
use tierpool::prelude::*;

type Sink = Arc<Mutex<Vec<String>>>;

fn record(pool: &FixedPool, sink: &Sink, marker: String, priority: Priority) -> bool {
    let sink = sink.clone();
    pool.execute(move || sink.lock().push(marker), priority)
}

/// Occupies every worker so the test can fill the queues before dispatch starts.
/// Each gate counts as one dispatch.
fn hold_workers(pool: &FixedPool, workers: usize) -> Arc<Barrier> {
    let barrier = Arc::new(Barrier::new(workers + 1));
    for _ in 0..workers {
        let b = barrier.clone();
        pool.execute(
            move || {
                b.wait();
                b.wait();
            },
            Priority::Low,
        );
    }
    barrier.wait();
    barrier
}

fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    cond()
}

#[test]
fn test_fifo_within_tier() {
    let pool = FixedPool::new(1).unwrap();
    let sink: Sink = Arc::new(Mutex::new(Vec::new()));

    let gate = hold_workers(&pool, 1);
    for i in 0..50 {
        record(&pool, &sink, format!("{:02}", i), Priority::Normal);
    }
    gate.wait();
    pool.shutdown().unwrap();

    let expected: Vec<String> = (0..50).map(|i| format!("{:02}", i)).collect();
    assert_eq!(*sink.lock(), expected);
}

#[test]
fn test_high_before_low() {
    let pool = FixedPool::new(1).unwrap();
    let sink: Sink = Arc::new(Mutex::new(Vec::new()));

    let gate = hold_workers(&pool, 1);
    for i in 0..5 {
        record(&pool, &sink, format!("L{}", i), Priority::Low);
        record(&pool, &sink, format!("H{}", i), Priority::High);
    }
    gate.wait();
    pool.shutdown().unwrap();

    assert_eq!(
        *sink.lock(),
        vec!["H0", "H1", "H2", "H3", "H4", "L0", "L1", "L2", "L3", "L4"]
    );
}

#[test]
fn test_mixed_tiers_single_worker_order() {
    let pool = FixedPool::new(1).unwrap();
    let sink: Sink = Arc::new(Mutex::new(Vec::new()));

    // the gate is the first dispatch, so the counter reaches 3 after high1
    let gate = hold_workers(&pool, 1);
    for tier in Priority::ALL {
        for i in 0..3 {
            record(&pool, &sink, format!("{}{}", tier, i), tier);
        }
    }
    gate.wait();
    pool.shutdown().unwrap();

    assert_eq!(
        *sink.lock(),
        vec!["high0", "high1", "normal0", "high2", "normal1", "normal2", "low0", "low1", "low2"]
    );
    assert_eq!(pool.metrics().forced_dispatches, 1);
}

#[test]
fn test_two_workers_nine_markers() {
    let pool = FixedPool::new(2).unwrap();
    let sink: Sink = Arc::new(Mutex::new(Vec::new()));

    let gate = hold_workers(&pool, 2);
    for tier in Priority::ALL {
        for i in 0..3 {
            record(&pool, &sink, format!("{}{}", tier, i), tier);
        }
    }
    gate.wait();
    pool.stop();
    pool.join().unwrap();

    let order = sink.lock();
    assert_eq!(order.len(), 9);
    let unique: HashSet<&String> = order.iter().collect();
    assert_eq!(unique.len(), 9);

    // two gates plus high0 bring the counter to 3, forcing normal0 next
    let metrics = pool.metrics();
    assert_eq!(metrics.forced_dispatches, 1);
    assert_eq!(metrics.tasks_executed, 11);
}

#[test]
fn test_anti_starvation_cadence() {
    let pool = FixedPool::new(1).unwrap();
    let sink: Sink = Arc::new(Mutex::new(Vec::new()));

    let gate = hold_workers(&pool, 1);
    for i in 0..12 {
        record(&pool, &sink, format!("H{}", i), Priority::High);
    }
    for i in 0..4 {
        record(&pool, &sink, format!("N{}", i), Priority::Normal);
    }
    gate.wait();
    pool.shutdown().unwrap();

    let order = sink.lock();
    assert_eq!(order.len(), 16);

    let first_forced = order.iter().position(|m| m == "N0").unwrap();
    assert_eq!(first_forced, 2);

    // while both tiers had work, every window of 4 dispatches holds a NORMAL task
    let last_normal = order.iter().rposition(|m| m.starts_with('N')).unwrap();
    for window in order[first_forced..=last_normal].windows(4) {
        assert!(window.iter().any(|m| m.starts_with('N')), "{:?}", window);
    }
    assert_eq!(pool.metrics().forced_dispatches, 4);
}

#[test]
fn test_post_stop_rejection() {
    let pool = FixedPool::new(2).unwrap();
    let done = Arc::new(AtomicUsize::new(0));

    for _ in 0..5 {
        let d = done.clone();
        assert!(pool.execute(
            move || {
                d.fetch_add(1, Ordering::SeqCst);
            },
            Priority::Normal
        ));
    }
    pool.stop();

    for priority in Priority::ALL {
        let d = done.clone();
        assert!(!pool.execute(
            move || {
                d.fetch_add(100, Ordering::SeqCst);
            },
            priority
        ));
    }

    pool.join().unwrap();
    assert_eq!(done.load(Ordering::SeqCst), 5);

    let metrics = pool.metrics();
    assert_eq!(metrics.tasks_submitted, 5);
    assert_eq!(metrics.tasks_rejected, 3);
    assert_eq!(pool.pending(), 0);
}

#[test]
fn test_drain_after_stop_without_join() {
    let pool = FixedPool::new(3).unwrap();
    let done = Arc::new(AtomicUsize::new(0));

    for i in 0..200 {
        let d = done.clone();
        pool.execute(
            move || {
                d.fetch_add(1, Ordering::SeqCst);
            },
            Priority::ALL[i % 3],
        );
    }
    pool.stop();

    assert!(wait_until(Duration::from_secs(10), || {
        done.load(Ordering::SeqCst) == 200
    }));
    assert!(wait_until(Duration::from_secs(10), || {
        pool.metrics().outstanding() == 0
    }));
}

#[test]
fn test_concurrent_first_submissions_spawn_once() {
    let pool = Arc::new(FixedPool::new(4).unwrap());
    let start = Arc::new(Barrier::new(8));
    let done = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pool = pool.clone();
            let start = start.clone();
            let done = done.clone();
            std::thread::spawn(move || {
                start.wait();
                for _ in 0..50 {
                    let d = done.clone();
                    pool.execute(
                        move || {
                            d.fetch_add(1, Ordering::SeqCst);
                        },
                        Priority::High,
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(pool.spawned_workers(), 4);
    pool.shutdown().unwrap();
    assert_eq!(done.load(Ordering::SeqCst), 400);
    assert_eq!(pool.metrics().workers_spawned, 4);
}

#[test]
fn test_stop_before_any_submission() {
    let pool = FixedPool::new(1).unwrap();
    pool.stop();
    pool.join().unwrap();

    assert_eq!(pool.spawned_workers(), 0);
    assert_eq!(pool.metrics().tasks_executed, 0);
}

struct MessageWriter {
    message: &'static str,
    sink: Sink,
}

impl Task for MessageWriter {
    fn run(self: Box<Self>) {
        self.sink.lock().push(self.message.to_string());
    }
}

#[test]
fn test_user_defined_task() {
    let pool = FixedPool::new(2).unwrap();
    let sink: Sink = Arc::new(Mutex::new(Vec::new()));

    assert!(pool.submit(
        MessageWriter {
            message: "hello",
            sink: sink.clone(),
        },
        Priority::Normal,
    ));
    pool.shutdown().unwrap();

    assert_eq!(*sink.lock(), vec!["hello"]);
}

#[test]
fn test_panics_do_not_shrink_pool() {
    let config = Config::builder()
        .num_threads(2)
        .panic_strategy(PanicStrategy::Isolate)
        .build()
        .unwrap();
    let pool = FixedPool::with_config(config).unwrap();
    let done = Arc::new(AtomicUsize::new(0));

    for i in 0..20 {
        let d = done.clone();
        pool.execute(
            move || {
                if i % 2 == 0 {
                    panic!("task {} failed", i);
                }
                d.fetch_add(1, Ordering::SeqCst);
            },
            Priority::Normal,
        );
    }
    pool.shutdown().unwrap();

    assert_eq!(done.load(Ordering::SeqCst), 10);
    let metrics = pool.metrics();
    assert_eq!(metrics.tasks_panicked, 10);
    assert_eq!(metrics.tasks_executed, 20);
}
