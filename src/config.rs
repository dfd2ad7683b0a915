use crate::error::{Error, Result};
use crate::executor::PanicStrategy;
use std::time::Duration;

/// Upper bound on the number of worker threads a pool may be built with.
pub const MAX_WORKERS: usize = 1024;

/// Dispatches without a forced NORMAL task before one is forced through.
pub const DEFAULT_STARVATION_THRESHOLD: u32 = 3;

#[derive(Debug, Clone)]
pub struct Config {
    pub num_threads: Option<usize>,
    pub thread_name_prefix: String,
    pub stack_size: Option<usize>,
    /// Longest an idle worker sleeps before re-checking the queues.
    pub idle_poll_interval: Duration,
    pub starvation_threshold: u32,
    pub panic_strategy: PanicStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_threads: None,
            thread_name_prefix: "tierpool-worker".to_string(),
            stack_size: Some(2 * 1024 * 1024),
            idle_poll_interval: Duration::from_secs(1),
            starvation_threshold: DEFAULT_STARVATION_THRESHOLD,
            panic_strategy: PanicStrategy::default(),
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(n) = self.num_threads {
            if n == 0 {
                return Err(Error::config("num_threads must be > 0"));
            }
            if n > MAX_WORKERS {
                return Err(Error::config(format!(
                    "num_threads too large (max {})",
                    MAX_WORKERS
                )));
            }
        }

        if self.idle_poll_interval.is_zero() {
            return Err(Error::config("idle_poll_interval must be > 0"));
        }

        if self.starvation_threshold == 0 {
            return Err(Error::config("starvation_threshold must be > 0"));
        }

        Ok(())
    }

    pub fn worker_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(num_cpus::get)
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn num_threads(mut self, n: usize) -> Self {
        self.config.num_threads = Some(n);
        self
    }

    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    pub fn idle_poll_interval(mut self, interval: Duration) -> Self {
        self.config.idle_poll_interval = interval;
        self
    }

    pub fn starvation_threshold(mut self, threshold: u32) -> Self {
        self.config.starvation_threshold = threshold;
        self
    }

    pub fn panic_strategy(mut self, strategy: PanicStrategy) -> Self {
        self.config.panic_strategy = strategy;
        self
    }

    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
