//! Cancellable single-shot debounce timer
//!
//! At most one deadline is armed at a time; arming again always
//! replaces the prior deadline. Firing is explicit and one-shot: once
//! [`DebounceTimer::fire_if_due`] reports true the timer is disarmed.

use std::time::Duration;

/// A single-shot deferred deadline driven by a caller-supplied clock
#[derive(Debug, Default)]
pub struct DebounceTimer {
    deadline: Option<Duration>,
}

impl DebounceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer to fire `delay` after `now`, cancelling any
    /// previously armed deadline
    pub fn arm(&mut self, now: Duration, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Discard the armed deadline, if any
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a deadline is currently armed
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Fire once when the deadline has passed; disarms on fire
    pub fn fire_if_due(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
