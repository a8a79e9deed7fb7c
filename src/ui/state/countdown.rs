// SPDX-License-Identifier: MPL-2.0
//! Restartable countdown shared by the overlay and the auto-hide controller.
//!
//! A countdown never sleeps itself. It only stores a deadline; the shell
//! sleeps and then asks [`Countdown::poll`] whether the deadline passed.
//! Restarting moves the deadline, so a wake-up that belongs to an earlier
//! restart finds the countdown still pending and learns how long is left.

use std::time::{Duration, Instant};

/// Result of polling a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Not armed.
    Idle,
    /// The deadline passed; the countdown is now disarmed.
    Due,
    /// Armed, due after the remaining duration.
    Pending(Duration),
}

#[derive(Debug, Clone)]
pub struct Countdown {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Countdown {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arms the countdown from `now`, replacing any earlier deadline.
    /// Returns the time until it is due.
    pub fn restart(&mut self, now: Instant) -> Duration {
        self.deadline = Some(now + self.delay);
        self.delay
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn poll(&mut self, now: Instant) -> Expiry {
        match self.deadline {
            None => Expiry::Idle,
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Expiry::Due
            }
            Some(deadline) => Expiry::Pending(deadline - now),
        }
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
