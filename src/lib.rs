//! tierpool - a fixed-size worker pool with three priority tiers.
//!
//! Tasks are submitted under [`Priority::High`], [`Priority::Normal`] or
//! [`Priority::Low`] and run by a fixed number of worker threads that are
//! started lazily on the first submission.
//!
//! # Quick Start
//!
//! ```no_run
//! use tierpool::prelude::*;
//!
//! let pool = FixedPool::new(4).unwrap();
//!
//! pool.execute(|| println!("runs first"), Priority::High);
//! pool.execute(|| println!("runs last"), Priority::Low);
//!
//! // stop accepting work, let the queued tasks finish
//! pool.shutdown().unwrap();
//! ```
//!
//! # Scheduling
//!
//! - Each tier is a FIFO queue.
//! - HIGH is served before NORMAL, NORMAL before LOW.
//! - After three dispatches without a forced NORMAL task, if both HIGH and
//!   NORMAL have work waiting, the next NORMAL task is forced through so
//!   NORMAL work cannot be starved by a steady stream of HIGH work. LOW work
//!   gets no such guarantee.
//! - A task that panics is contained at the task boundary; the worker keeps
//!   running (see [`PanicStrategy`]).

#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod scheduler;
pub mod telemetry;

// Re-export key types at crate root
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use executor::{FixedPool, PanicStrategy, Task};
pub use scheduler::Priority;
