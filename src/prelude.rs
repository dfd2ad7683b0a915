pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Error, Result};
pub use crate::executor::{FixedPool, PanicStrategy, Task};
pub use crate::scheduler::Priority;
pub use crate::telemetry::MetricsSnapshot;
