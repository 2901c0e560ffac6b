//! Trailing-edge debouncing.
//!
//! [`Debouncer`] is a plain state holder: it never sleeps and never spawns. The owner feeds it
//! values with the current time, waits until [`Debouncer::deadline`] (typically with
//! `tokio::time::sleep_until` inside a `select!`), then collects the stabilized value with
//! [`Debouncer::take_ready`]. Keeping the clock outside makes the behaviour deterministic under
//! test.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Holds the latest value until it has been left alone for `delay`.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a new value, replacing any pending one and restarting the delay.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.delay,
        });
    }

    /// When the pending value will be stable, or `None` if nothing is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value if its delay has fully elapsed at `now`.
    pub fn take_ready(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if now >= p.deadline => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Drop the pending value without emitting it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }
}
