// SPDX-License-Identifier: MPL-2.0
//! Visibility of the seek bar.
//!
//! Any activity shows the controls and restarts the hide countdown; the
//! controls hide once the countdown of the last activity in a burst runs out.

use super::state::{Countdown, Expiry};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct AutoHide {
    visible: bool,
    countdown: Countdown,
}

impl AutoHide {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            visible: false,
            countdown: Countdown::new(timeout),
        }
    }

    /// Shows the controls. Returns the time until they hide.
    pub fn mark_activity(&mut self, now: Instant) -> Duration {
        self.visible = true;
        self.countdown.restart(now)
    }

    /// Hides the controls once the last activity is `timeout` old.
    pub fn poll(&mut self, now: Instant) -> Expiry {
        let expiry = self.countdown.poll(now);
        if expiry == Expiry::Due {
            self.visible = false;
        }
        expiry
    }

    pub fn cancel(&mut self) {
        self.countdown.cancel();
        self.visible = false;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn hides_at(&self) -> Option<Instant> {
        self.countdown.deadline()
    }
}
