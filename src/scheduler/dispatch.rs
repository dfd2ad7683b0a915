//! Next-task selection over the tiered queues.
//!
//! Selection order, evaluated on every request:
//!
//! 1. NORMAL and HIGH both non-empty and the counter at or above the
//!    threshold: reset the counter and take the head of NORMAL.
//! 2. Otherwise the head of the first non-empty tier in HIGH, NORMAL, LOW
//!    order, incrementing the counter.
//!
//! The counter is bumped by every dispatch that is not forced, whatever its
//! tier, so it measures dispatches since the last forced NORMAL task. LOW
//! tasks are never forced through.

use super::priority::{Priority, TierQueues};
use crate::config::DEFAULT_STARVATION_THRESHOLD;

/// A task picked by the dispatcher, tagged with how it was picked.
#[derive(Debug)]
pub struct Dispatch<T> {
    pub item: T,
    pub tier: Priority,
    /// True when the anti-starvation rule picked this NORMAL task.
    pub forced: bool,
}

#[derive(Debug)]
pub struct Dispatcher<T> {
    queues: TierQueues<T>,
    consecutive: u32,
    threshold: u32,
}

impl<T> Dispatcher<T> {
    pub fn new(threshold: u32) -> Self {
        Self {
            queues: TierQueues::new(),
            consecutive: 0,
            threshold,
        }
    }

    pub fn push(&mut self, priority: Priority, item: T) {
        self.queues.push(priority, item);
    }

    /// Removes and returns the next task to run, or `None` if every tier is empty.
    pub fn next_task(&mut self) -> Option<T> {
        self.next().map(|dispatch| dispatch.item)
    }

    /// Like [`next_task`](Self::next_task) but reports the tier and branch taken.
    pub fn next(&mut self) -> Option<Dispatch<T>> {
        let forced = !self.queues.is_empty(Priority::Normal)
            && !self.queues.is_empty(Priority::High)
            && self.consecutive >= self.threshold;

        let tier = if forced {
            Priority::Normal
        } else {
            Priority::ALL
                .into_iter()
                .find(|&tier| !self.queues.is_empty(tier))?
        };

        // tier was checked non-empty above, underflow cannot happen here
        let item = self.queues.take_front(tier).ok()?;

        if forced {
            self.consecutive = 0;
        } else {
            self.consecutive = self.consecutive.saturating_add(1);
        }

        Some(Dispatch { item, tier, forced })
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn queues(&self) -> &TierQueues<T> {
        &self.queues
    }

    pub fn pending(&self) -> usize {
        self.queues.total_len()
    }
}

impl<T> Default for Dispatcher<T> {
    fn default() -> Self {
        Self::new(DEFAULT_STARVATION_THRESHOLD)
    }
}
