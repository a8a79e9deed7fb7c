// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons and a scripted media element.
//!
//! This module re-exports the `approx` crate's float assertion macro,
//! which handles floating-point precision issues that `assert_eq!` cannot.

pub use approx::assert_abs_diff_eq;

use crate::error::VideoError;
use crate::media::{ElementNotice, MediaElement, PlayableSource, SourceId};
use crate::video_player::Volume;
use std::time::Duration;

/// Events a test can feed to [`FakeElement`].
#[derive(Debug, Clone, PartialEq)]
pub enum FakeEvent {
    Duration(Duration),
    Time(Duration),
    Ended,
    Fail(String),
}

/// In-memory element that records the calls made on it.
#[derive(Debug, Clone)]
pub struct FakeElement {
    pub source: SourceId,
    pub time: Duration,
    pub duration: Option<Duration>,
    pub volume: Volume,
    pub paused: bool,
    pub released: bool,
    pub play_calls: usize,
}

impl MediaElement for FakeElement {
    type Event = FakeEvent;

    fn open(source: &PlayableSource) -> Self {
        Self {
            source: source.id(),
            time: Duration::ZERO,
            duration: None,
            volume: Volume::new(1.0),
            paused: true,
            released: false,
            play_calls: 0,
        }
    }

    fn current_time(&self) -> Duration {
        self.time
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn volume(&self) -> Volume {
        self.volume
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) {
        self.paused = false;
        self.play_calls += 1;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn seek(&mut self, target: Duration) {
        self.time = match self.duration {
            Some(total) => target.min(total),
            None => target,
        };
    }

    fn release(&mut self) {
        self.released = true;
        self.paused = true;
    }

    fn handle_event(&mut self, event: FakeEvent) -> ElementNotice {
        match event {
            FakeEvent::Duration(total) => {
                self.duration = Some(total);
                ElementNotice::Metadata
            }
            FakeEvent::Time(time) => {
                self.time = time;
                ElementNotice::TimeUpdate
            }
            FakeEvent::Ended => {
                self.paused = true;
                ElementNotice::Ended
            }
            FakeEvent::Fail(message) => ElementNotice::Error(VideoError::from_message(&message)),
        }
    }
}
