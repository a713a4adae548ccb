use std::time::Duration;

use super::{Scheduler, Tick, TimerHandle};

#[derive(Debug)]
struct Entry {
    deadline: Duration,
    handle: TimerHandle,
    tick: Tick,
}

/// Simulated clock. Time only moves when the owner pops due ticks.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_handle: u64,
    entries: Vec<Entry>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed simulated time since creation.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers still waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Remove and return the earliest tick due at or before `until`, moving
    /// the clock to its deadline. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<Tick> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.deadline <= until)
            .min_by_key(|(_, entry)| (entry.deadline, entry.handle))
            .map(|(idx, _)| idx)?;
        let entry = self.entries.remove(idx);
        self.now = self.now.max(entry.deadline);
        Some(entry.tick)
    }

    /// Move the clock forward without firing anything. Never goes backwards.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, after: Duration, tick: Tick) -> TimerHandle {
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        self.entries.push(Entry {
            deadline: self.now + after,
            handle,
            tick,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.entries.retain(|entry| entry.handle != handle);
    }
}
