//! Task execution infrastructure.
//!
//! This module provides the task abstraction, the worker thread loop, panic
//! containment and the fixed-size pool that ties them to the scheduler.

pub mod panic_handler;
pub mod pool;
pub mod task;
pub mod worker;

pub use panic_handler::{PanicHandler, PanicStrategy, TaskPanic};
pub use pool::FixedPool;
pub use task::{Task, TaskId};
pub use worker::WorkerId;
