//! Debounce for filter passes triggered by query edits.
//!
//! Each edit bumps a generation and pushes the deadline out. Only the newest
//! generation ever runs, so a burst of keystrokes costs one filter pass.

use std::time::{Duration, Instant};

/// Idle time after the last keystroke before the list is re-filtered
pub const FILTER_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    generation: u64,
    deadline: Instant,
}

#[derive(Debug)]
pub struct FilterScheduler {
    delay: Duration,
    generation: u64,
    pending: Option<Pending>,
}

impl Default for FilterScheduler {
    fn default() -> Self {
        Self::new(FILTER_DELAY)
    }
}

impl FilterScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    /// Queue a filter pass, superseding any pass still waiting.
    /// Returns the generation of the queued pass.
    pub fn schedule(&mut self, now: Instant) -> u64 {
        self.generation += 1;
        self.pending = Some(Pending {
            generation: self.generation,
            deadline: now + self.delay,
        });
        self.generation
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Claim the pending pass if its deadline has passed
    pub fn take_due(&mut self, now: Instant) -> Option<u64> {
        match self.pending {
            Some(p) if p.deadline <= now && p.generation == self.generation => {
                self.pending = None;
                Some(p.generation)
            }
            _ => None,
        }
    }

    /// Claim the pending pass immediately, whatever its deadline
    pub fn flush(&mut self) -> Option<u64> {
        self.pending.take().map(|p| p.generation)
    }
}
