//! Tiered task scheduling.
//!
//! The scheduler decides which queued task a worker runs next: three FIFO
//! queues, one per [`Priority`], and a [`Dispatcher`] that applies the
//! priority order plus the anti-starvation rule for NORMAL tasks.

pub mod dispatch;
pub mod priority;

pub use dispatch::{Dispatch, Dispatcher};
pub use priority::{Priority, TierQueues};
