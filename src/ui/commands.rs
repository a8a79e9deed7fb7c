// SPDX-License-Identifier: MPL-2.0
//! Keyboard playback commands.
//!
//! | Key     | Command          |
//! |---------|------------------|
//! | `h`     | seek back        |
//! | `l`     | seek forward     |
//! | `k`     | volume up        |
//! | `j`     | volume down      |
//! | `space` | play / pause     |
//! | `f`     | fullscreen       |
//! | `r`     | rotate           |
//!
//! Presses with Ctrl, Alt or Logo held never map to a command.

use super::overlay::OverlayText;
use crate::config::{Config, DEFAULT_SEEK_STEP_SECS, DEFAULT_VOLUME_STEP};
use crate::media::MediaElement;
use std::time::Duration;

/// Toolkit-independent key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    /// Ctrl, Alt or Logo was held.
    pub command_modifier: bool,
}

impl KeyPress {
    #[must_use]
    pub fn character(c: char) -> Self {
        Self {
            key: Key::Character(c),
            command_modifier: false,
        }
    }

    #[must_use]
    pub fn space() -> Self {
        Self {
            key: Key::Space,
            command_modifier: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Character(char),
    Space,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SeekBack,
    SeekForward,
    VolumeUp,
    VolumeDown,
    TogglePlayback,
    ToggleFullscreen,
    Rotate,
}

impl Command {
    #[must_use]
    pub fn from_key(press: &KeyPress) -> Option<Self> {
        if press.command_modifier {
            return None;
        }
        match press.key {
            Key::Character('h') => Some(Self::SeekBack),
            Key::Character('l') => Some(Self::SeekForward),
            Key::Character('k') => Some(Self::VolumeUp),
            Key::Character('j') => Some(Self::VolumeDown),
            Key::Character('f') => Some(Self::ToggleFullscreen),
            Key::Character('r') => Some(Self::Rotate),
            Key::Space => Some(Self::TogglePlayback),
            Key::Character(_) | Key::Other => None,
        }
    }
}

/// Applies media commands to an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatcher {
    seek_step: Duration,
    volume_step: f32,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self {
            seek_step: Duration::from_secs_f64(DEFAULT_SEEK_STEP_SECS),
            volume_step: DEFAULT_VOLUME_STEP,
        }
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new(seek_step: Duration, volume_step: f32) -> Self {
        Self {
            seek_step,
            volume_step,
        }
    }

    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.playback.seek_step(), config.playback.volume_step())
    }

    #[must_use]
    pub fn seek_step(&self) -> Duration {
        self.seek_step
    }

    /// Runs a media command. Returns `None` for commands that do not act on
    /// the element.
    pub fn apply<E: MediaElement>(&self, command: Command, element: &mut E) -> Option<OverlayText> {
        let text = match command {
            Command::SeekBack => {
                let target = element.current_time().saturating_sub(self.seek_step);
                element.seek(target);
                OverlayText::SeekBack(self.seek_step)
            }
            Command::SeekForward => {
                let target = element.current_time() + self.seek_step;
                element.seek(target);
                OverlayText::SeekForward(self.seek_step)
            }
            Command::VolumeUp => {
                element.set_volume(element.volume().increase_by(self.volume_step));
                OverlayText::Volume(element.volume().percent())
            }
            Command::VolumeDown => {
                element.set_volume(element.volume().decrease_by(self.volume_step));
                OverlayText::Volume(element.volume().percent())
            }
            Command::TogglePlayback => {
                if element.is_paused() {
                    element.play();
                    OverlayText::Play
                } else {
                    element.pause();
                    OverlayText::Pause
                }
            }
            Command::ToggleFullscreen | Command::Rotate => return None,
        };
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::SourceRegistry;
    use crate::test_utils::{assert_abs_diff_eq, FakeElement};
    use crate::video_player::Volume;
    use std::path::Path;

    fn element() -> FakeElement {
        let source = SourceRegistry::new().create(Path::new("clip.mp4"));
        FakeElement::open(&source)
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(Command::from_key(&KeyPress::character('h')), Some(Command::SeekBack));
        assert_eq!(Command::from_key(&KeyPress::character('l')), Some(Command::SeekForward));
        assert_eq!(Command::from_key(&KeyPress::character('k')), Some(Command::VolumeUp));
        assert_eq!(Command::from_key(&KeyPress::character('j')), Some(Command::VolumeDown));
        assert_eq!(Command::from_key(&KeyPress::space()), Some(Command::TogglePlayback));
        assert_eq!(Command::from_key(&KeyPress::character('f')), Some(Command::ToggleFullscreen));
        assert_eq!(Command::from_key(&KeyPress::character('r')), Some(Command::Rotate));
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(Command::from_key(&KeyPress::character('x')), None);
        assert_eq!(Command::from_key(&KeyPress::character('H')), None);
        assert_eq!(
            Command::from_key(&KeyPress {
                key: Key::Other,
                command_modifier: false
            }),
            None
        );
    }

    #[test]
    fn modifier_presses_are_ignored() {
        let press = KeyPress {
            key: Key::Character('f'),
            command_modifier: true,
        };
        assert_eq!(Command::from_key(&press), None);
    }

    #[test]
    fn seek_back_clamps_at_zero() {
        let dispatcher = Dispatcher::default();
        let mut element = element();
        element.time = Duration::from_secs(3);

        let text = dispatcher.apply(Command::SeekBack, &mut element);

        assert_eq!(element.time, Duration::ZERO);
        assert_eq!(text, Some(OverlayText::SeekBack(Duration::from_secs(5))));
    }

    #[test]
    fn seek_forward_adds_step() {
        let dispatcher = Dispatcher::default();
        let mut element = element();
        element.duration = Some(Duration::from_secs(60));
        element.time = Duration::from_secs(10);

        dispatcher.apply(Command::SeekForward, &mut element);
        assert_eq!(element.time, Duration::from_secs(15));
    }

    #[test]
    fn volume_steps_are_clamped() {
        let dispatcher = Dispatcher::default();
        let mut element = element();
        element.volume = Volume::new(1.0);

        for _ in 0..3 {
            assert_eq!(
                dispatcher.apply(Command::VolumeUp, &mut element),
                Some(OverlayText::Volume(100))
            );
        }
        assert_abs_diff_eq!(element.volume.value(), 1.0);

        element.volume = Volume::new(0.0);
        for _ in 0..3 {
            dispatcher.apply(Command::VolumeDown, &mut element);
        }
        assert_abs_diff_eq!(element.volume.value(), 0.0);
    }

    #[test]
    fn volume_text_reports_rounded_percent() {
        let dispatcher = Dispatcher::default();
        let mut element = element();
        element.volume = Volume::new(0.0);

        dispatcher.apply(Command::VolumeUp, &mut element);
        let text = dispatcher.apply(Command::VolumeUp, &mut element);

        assert_eq!(text, Some(OverlayText::Volume(10)));
    }

    #[test]
    fn toggle_playback_alternates() {
        let dispatcher = Dispatcher::default();
        let mut element = element();

        assert_eq!(dispatcher.apply(Command::TogglePlayback, &mut element), Some(OverlayText::Play));
        assert!(!element.paused);
        assert_eq!(dispatcher.apply(Command::TogglePlayback, &mut element), Some(OverlayText::Pause));
        assert!(element.paused);
    }

    #[test]
    fn window_commands_do_not_touch_element() {
        let dispatcher = Dispatcher::default();
        let mut element = element();

        assert_eq!(dispatcher.apply(Command::Rotate, &mut element), None);
        assert_eq!(dispatcher.apply(Command::ToggleFullscreen, &mut element), None);
        assert_eq!(element.play_calls, 0);
    }
}
