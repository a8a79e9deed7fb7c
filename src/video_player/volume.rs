// SPDX-License-Identifier: MPL-2.0
//! Volume domain type for audio playback.

use crate::config::{INITIAL_VOLUME, MAX_VOLUME, MIN_VOLUME};

/// Volume level, always within `0.0..=1.0`.
///
/// # Example
///
/// ```
/// use dropplay::video_player::Volume;
///
/// assert_eq!(Volume::new(2.0).value(), 1.0);
/// assert_eq!(Volume::default().percent(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume(f32);

impl Volume {
    /// Creates a volume level, clamping into range. NaN maps to silence.
    #[must_use]
    pub fn new(volume: f32) -> Self {
        if volume.is_nan() {
            return Self(MIN_VOLUME);
        }
        Self(volume.clamp(MIN_VOLUME, MAX_VOLUME))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Rounded percentage shown in the overlay.
    #[must_use]
    pub fn percent(self) -> u32 {
        // Always within 0..=100 after clamping
        (self.0 * 100.0).round() as u32
    }

    #[must_use]
    pub fn is_muted(self) -> bool {
        self.0 < 0.001
    }

    #[must_use]
    pub fn increase_by(self, step: f32) -> Self {
        Self::new(self.0 + step)
    }

    #[must_use]
    pub fn decrease_by(self, step: f32) -> Self {
        Self::new(self.0 - step)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(INITIAL_VOLUME)
    }
}
