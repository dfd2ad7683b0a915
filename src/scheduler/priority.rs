use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::fmt;

/// Priority tier a task is submitted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Priority {
    High = 0,
    Normal = 1,
    Low = 2,
}

impl Priority {
    /// All tiers, most urgent first.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Normal, Priority::Low];

    fn index(self) -> usize {
        self as usize
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
        };
        f.write_str(name)
    }
}

/// One unbounded FIFO queue per priority tier.
///
/// Not synchronized; the pool keeps it behind its single lock.
pub struct TierQueues<T> {
    queues: [VecDeque<T>; 3],
}

impl<T> TierQueues<T> {
    pub fn new() -> Self {
        Self {
            queues: [VecDeque::new(), VecDeque::new(), VecDeque::new()],
        }
    }

    /// Appends `item` to the tail of its tier.
    pub fn push(&mut self, priority: Priority, item: T) {
        self.queues[priority.index()].push_back(item);
    }

    /// Removes the head of a tier, failing with underflow when it is empty.
    pub fn take_front(&mut self, priority: Priority) -> Result<T> {
        self.queues[priority.index()]
            .pop_front()
            .ok_or(Error::QueueUnderflow(priority))
    }

    pub fn len(&self, priority: Priority) -> usize {
        self.queues[priority.index()].len()
    }

    pub fn is_empty(&self, priority: Priority) -> bool {
        self.queues[priority.index()].is_empty()
    }

    pub fn total_len(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    pub fn is_all_empty(&self) -> bool {
        self.queues.iter().all(VecDeque::is_empty)
    }
}

impl<T> Default for TierQueues<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for TierQueues<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TierQueues")
            .field("high", &self.len(Priority::High))
            .field("normal", &self.len(Priority::Normal))
            .field("low", &self.len(Priority::Low))
            .finish()
    }
}
