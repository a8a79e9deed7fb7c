// SPDX-License-Identifier: MPL-2.0
//! The media element port.
//!
//! The viewer drives playback only through [`MediaElement`]. The production
//! implementation is [`crate::video_player::VideoPlayer`]; tests substitute a
//! scripted element.

use super::PlayableSource;
use crate::error::VideoError;
use crate::video_player::Volume;
use std::time::Duration;

/// What a playback event meant to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementNotice {
    /// Nothing observable changed.
    None,
    /// Duration became known.
    Metadata,
    /// Current time moved.
    TimeUpdate,
    Ended,
    Error(VideoError),
}

pub trait MediaElement {
    /// Events produced by the element's playback pipeline.
    type Event;

    /// Creates an element bound to `source`. It starts paused at zero.
    fn open(source: &PlayableSource) -> Self
    where
        Self: Sized;

    fn current_time(&self) -> Duration;

    /// `None` until the container reports a duration.
    fn duration(&self) -> Option<Duration>;

    fn volume(&self) -> Volume;

    fn set_volume(&mut self, volume: Volume);

    fn is_paused(&self) -> bool;

    fn play(&mut self);

    fn pause(&mut self);

    /// Moves the playhead. Targets are clamped to `[0, duration]`.
    fn seek(&mut self, target: Duration);

    /// Stops playback and drops every pipeline resource.
    fn release(&mut self);

    fn handle_event(&mut self, event: Self::Event) -> ElementNotice;
}

/// Playback progress in `[0, 1]`, `None` while the duration is unknown.
///
/// ```
/// use dropplay::media::progress_fraction;
/// use std::time::Duration;
///
/// let p = progress_fraction(Duration::from_secs(25), Some(Duration::from_secs(100)));
/// assert_eq!(p, Some(0.25));
/// assert_eq!(progress_fraction(Duration::from_secs(3), None), None);
/// ```
pub fn progress_fraction(current: Duration, duration: Option<Duration>) -> Option<f64> {
    let total = duration?.as_secs_f64();
    if total <= 0.0 {
        return None;
    }
    Some((current.as_secs_f64() / total).clamp(0.0, 1.0))
}
