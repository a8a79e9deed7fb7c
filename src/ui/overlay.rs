// SPDX-License-Identifier: MPL-2.0
//! Transient action message shown in the top-right corner.
//!
//! A new message replaces the current one at once and re-arms the expiry.
//! There is no queue: only the deadline of the latest message can clear it.

use super::state::{Countdown, Expiry};
use crate::i18n::I18n;
use fluent_bundle::FluentArgs;
use std::time::{Duration, Instant};

/// Text of an overlay message, rendered through the active locale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayText {
    SeekBack(Duration),
    SeekForward(Duration),
    /// Volume as a rounded percentage.
    Volume(u32),
    Play,
    Pause,
    FullscreenToggled,
    Rotate,
}

impl OverlayText {
    pub fn render(&self, i18n: &I18n) -> String {
        match self {
            Self::SeekBack(step) => seek_message(i18n, "overlay-seek-back", *step),
            Self::SeekForward(step) => seek_message(i18n, "overlay-seek-forward", *step),
            Self::Volume(percent) => {
                let mut args = FluentArgs::new();
                args.set("percent", *percent);
                i18n.tr_with_args("overlay-volume", &args)
            }
            Self::Play => i18n.tr("overlay-play"),
            Self::Pause => i18n.tr("overlay-pause"),
            Self::FullscreenToggled => i18n.tr("overlay-fullscreen"),
            Self::Rotate => i18n.tr("overlay-rotate"),
        }
    }
}

fn seek_message(i18n: &I18n, key: &str, step: Duration) -> String {
    let mut args = FluentArgs::new();
    args.set("seconds", step.as_secs_f64());
    i18n.tr_with_args(key, &args)
}

#[derive(Debug, Clone)]
pub struct Overlay {
    message: Option<OverlayText>,
    countdown: Countdown,
}

impl Overlay {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            message: None,
            countdown: Countdown::new(delay),
        }
    }

    /// Shows `text` now, superseding any current message and its expiry.
    /// Returns the time until it clears.
    pub fn show(&mut self, text: OverlayText, now: Instant) -> Duration {
        self.message = Some(text);
        self.countdown.restart(now)
    }

    /// Clears the message once its own delay has run out.
    pub fn poll(&mut self, now: Instant) -> Expiry {
        let expiry = self.countdown.poll(now);
        if expiry == Expiry::Due {
            self.message = None;
        }
        expiry
    }

    pub fn cancel(&mut self) {
        self.countdown.cancel();
        self.message = None;
    }

    #[must_use]
    pub fn message(&self) -> Option<OverlayText> {
        self.message
    }

    #[must_use]
    pub fn expires_at(&self) -> Option<Instant> {
        self.countdown.deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    const DELAY: Duration = Duration::from_secs(2);

    #[test]
    fn message_clears_at_its_deadline() {
        let mut overlay = Overlay::new(DELAY);
        let now = Instant::now();
        let delay = overlay.show(OverlayText::Rotate, now);

        assert_eq!(overlay.message(), Some(OverlayText::Rotate));
        assert_eq!(overlay.expires_at(), Some(now + DELAY));
        assert_eq!(delay, DELAY);

        assert_eq!(overlay.poll(now + DELAY), Expiry::Due);
        assert_eq!(overlay.message(), None);
    }

    #[test]
    fn newer_message_outlives_older_deadline() {
        let mut overlay = Overlay::new(DELAY);
        let now = Instant::now();
        overlay.show(OverlayText::Play, now);
        overlay.show(OverlayText::Pause, now + Duration::from_secs(1));

        assert_eq!(
            overlay.poll(now + DELAY),
            Expiry::Pending(Duration::from_secs(1))
        );
        assert_eq!(overlay.message(), Some(OverlayText::Pause));
        assert_eq!(overlay.expires_at(), Some(now + Duration::from_secs(3)));

        assert_eq!(overlay.poll(now + Duration::from_secs(3)), Expiry::Due);
        assert_eq!(overlay.message(), None);
    }

    #[test]
    fn cancel_clears_message() {
        let mut overlay = Overlay::new(DELAY);
        let now = Instant::now();
        overlay.show(OverlayText::FullscreenToggled, now);

        overlay.cancel();

        assert_eq!(overlay.message(), None);
        assert_eq!(overlay.poll(now + DELAY), Expiry::Idle);
    }

    #[test]
    fn texts_render_in_english() {
        let i18n = I18n::new(Some("en-US".into()), &Config::default());
        let five = Duration::from_secs(5);

        assert_eq!(OverlayText::SeekBack(five).render(&i18n), "seek back 5s");
        assert_eq!(OverlayText::SeekForward(five).render(&i18n), "seek forward 5s");
        assert_eq!(OverlayText::Volume(35).render(&i18n), "volume 35%");
        assert_eq!(OverlayText::Play.render(&i18n), "play");
        assert_eq!(OverlayText::Pause.render(&i18n), "stop");
        assert_eq!(OverlayText::FullscreenToggled.render(&i18n), "fullscreen toggled");
        assert_eq!(OverlayText::Rotate.render(&i18n), "rotate");
    }

    #[test]
    fn texts_render_in_japanese() {
        let i18n = I18n::new(Some("ja".into()), &Config::default());

        assert_eq!(OverlayText::SeekBack(Duration::from_secs(5)).render(&i18n), "5秒戻る");
        assert_eq!(OverlayText::Volume(100).render(&i18n), "音量 100%");
        assert_eq!(OverlayText::FullscreenToggled.render(&i18n), "全画面切替");
    }
}
