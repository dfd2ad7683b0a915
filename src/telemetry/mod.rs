//! Pool telemetry.
//!
//! Counters only; log output goes through `tracing` at the call sites.

pub mod metrics;

pub use metrics::{Metrics, MetricsSnapshot};
