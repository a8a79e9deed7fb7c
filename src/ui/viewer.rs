// SPDX-License-Identifier: MPL-2.0
//! Viewer: the single event sink of the player window.
//!
//! The viewer owns the media session and every feedback component, turns
//! window and playback events into state changes, and reports the deferred
//! work the shell has to schedule as [`Effect`]s. It never touches the
//! toolkit, which keeps the whole behaviour testable with a scripted element.

use super::auto_hide::AutoHide;
use super::commands::{Command, Dispatcher, KeyPress};
use super::drop_zone::{DropDecision, DropZone};
use super::fullscreen::{Fullscreen, WindowMode};
use super::overlay::{Overlay, OverlayText};
use super::state::{Expiry, RotationAngle};
use crate::config::{Config, DEFAULT_CONTROLS_TIMEOUT_SECS, DEFAULT_OVERLAY_MESSAGE_MS};
use crate::media::{LoadedMedia, MediaElement, MediaSession, SourceId};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerSettings {
    pub dispatcher: Dispatcher,
    pub overlay_delay: Duration,
    pub controls_timeout: Duration,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            dispatcher: Dispatcher::default(),
            overlay_delay: Duration::from_millis(DEFAULT_OVERLAY_MESSAGE_MS),
            controls_timeout: Duration::from_secs(DEFAULT_CONTROLS_TIMEOUT_SECS),
        }
    }
}

impl ViewerSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            dispatcher: Dispatcher::from_config(config),
            overlay_delay: config.overlay.message_duration(),
            controls_timeout: config.overlay.controls_timeout(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Overlay,
    AutoHide,
}

/// Deferred work for the shell.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Report `TimerElapsed(kind)` after `delay`. At most one is outstanding
    /// per kind.
    Schedule { kind: TimerKind, delay: Duration },
    /// Request the mode, then report the mode the window ended up in.
    SetWindowMode(WindowMode),
    /// Report the current window mode.
    QueryWindowMode,
}

/// Timer kinds with a wake-up outstanding in the shell.
#[derive(Debug, Clone, Copy, Default)]
struct PendingTimers {
    overlay: bool,
    auto_hide: bool,
}

impl PendingTimers {
    fn slot(&mut self, kind: TimerKind) -> &mut bool {
        match kind {
            TimerKind::Overlay => &mut self.overlay,
            TimerKind::AutoHide => &mut self.auto_hide,
        }
    }
}

/// Input to the viewer. `P` is the element's playback event type.
#[derive(Debug, Clone)]
pub enum Event<P> {
    FileHovered,
    FileDropped(PathBuf),
    FilesHoveredLeft,
    /// A path given on the command line.
    OpenPath(PathBuf),
    KeyPressed(KeyPress),
    PointerMoved,
    WindowResized,
    /// Mode the window reported after a request or a resize.
    WindowModeObserved(WindowMode),
    TimerElapsed(TimerKind),
    /// Click on the seek bar at a fraction of its width.
    SeekBarClicked(f64),
    Playback { source: SourceId, event: P },
    CloseRequested,
}

#[derive(Debug)]
pub struct Viewer<E> {
    session: MediaSession<E>,
    overlay: Overlay,
    auto_hide: AutoHide,
    fullscreen: Fullscreen,
    drop_zone: DropZone,
    dispatcher: Dispatcher,
    rotation: RotationAngle,
    timers: PendingTimers,
    closed: bool,
}

impl<E: MediaElement> Default for Viewer<E> {
    fn default() -> Self {
        Self::new(ViewerSettings::default())
    }
}

impl<E: MediaElement> Viewer<E> {
    #[must_use]
    pub fn new(settings: ViewerSettings) -> Self {
        Self {
            session: MediaSession::new(),
            overlay: Overlay::new(settings.overlay_delay),
            auto_hide: AutoHide::new(settings.controls_timeout),
            fullscreen: Fullscreen::new(),
            drop_zone: DropZone::new(),
            dispatcher: settings.dispatcher,
            rotation: RotationAngle::default(),
            timers: PendingTimers::default(),
            closed: false,
        }
    }

    pub fn handle(&mut self, event: Event<E::Event>, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.closed {
            return effects;
        }

        match event {
            Event::FileHovered => self.drop_zone.file_hovered(),
            Event::FilesHoveredLeft => self.drop_zone.hover_left(),
            Event::FileDropped(path) => {
                let decision = self.drop_zone.file_dropped(&path);
                self.accept_drop(decision, now, &mut effects);
            }
            Event::OpenPath(path) => {
                let decision = self.drop_zone.single(&path);
                self.accept_drop(decision, now, &mut effects);
            }
            Event::KeyPressed(press) => {
                self.drop_zone.reset();
                self.on_key(&press, now, &mut effects);
            }
            Event::PointerMoved => {
                self.drop_zone.reset();
                self.mark_activity(now, &mut effects);
            }
            Event::WindowResized => effects.push(Effect::QueryWindowMode),
            Event::WindowModeObserved(mode) => {
                if self.fullscreen.observe(mode) {
                    self.mark_activity(now, &mut effects);
                }
            }
            Event::TimerElapsed(kind) => {
                *self.timers.slot(kind) = false;
                let expiry = match kind {
                    TimerKind::Overlay => self.overlay.poll(now),
                    TimerKind::AutoHide => self.auto_hide.poll(now),
                };
                if let Expiry::Pending(remaining) = expiry {
                    self.schedule(kind, remaining, &mut effects);
                }
            }
            Event::SeekBarClicked(fraction) => {
                self.session.seek_to_fraction(fraction);
            }
            Event::Playback { source, event } => {
                self.session.handle_event(source, event);
            }
            Event::CloseRequested => self.teardown(),
        }

        effects
    }

    fn accept_drop(&mut self, decision: DropDecision, now: Instant, effects: &mut Vec<Effect>) {
        if let DropDecision::Accept(path) = decision {
            self.session.load(&path);
            self.mark_activity(now, effects);
        }
    }

    fn on_key(&mut self, press: &KeyPress, now: Instant, effects: &mut Vec<Effect>) {
        let Some(command) = Command::from_key(press) else {
            return;
        };

        let text = match command {
            Command::Rotate => {
                self.rotation = self.rotation.rotate_clockwise();
                OverlayText::Rotate
            }
            Command::ToggleFullscreen => {
                effects.push(Effect::SetWindowMode(self.fullscreen.toggle()));
                OverlayText::FullscreenToggled
            }
            _ => {
                let Some(element) = self.session.element_mut() else {
                    return;
                };
                let Some(text) = self.dispatcher.apply(command, element) else {
                    return;
                };
                self.session.refresh_progress();
                text
            }
        };

        self.mark_activity(now, effects);
        let delay = self.overlay.show(text, now);
        self.schedule(TimerKind::Overlay, delay, effects);
    }

    fn mark_activity(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        let delay = self.auto_hide.mark_activity(now);
        self.schedule(TimerKind::AutoHide, delay, effects);
    }

    /// Asks for a wake-up unless one is already outstanding. An early
    /// wake-up finds the countdown pending and schedules the rest.
    fn schedule(&mut self, kind: TimerKind, delay: Duration, effects: &mut Vec<Effect>) {
        let pending = self.timers.slot(kind);
        if !*pending {
            *pending = true;
            effects.push(Effect::Schedule { kind, delay });
        }
    }

    fn teardown(&mut self) {
        self.overlay.cancel();
        self.auto_hide.cancel();
        self.session.unload();
        self.closed = true;
        tracing::info!("viewer closed");
    }

    #[must_use]
    pub fn media(&self) -> Option<&LoadedMedia<E>> {
        self.session.current()
    }

    #[must_use]
    pub fn session(&self) -> &MediaSession<E> {
        &self.session
    }

    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        self.session.progress()
    }

    #[must_use]
    pub fn rotation(&self) -> RotationAngle {
        self.rotation
    }

    #[must_use]
    pub fn overlay_text(&self) -> Option<OverlayText> {
        self.overlay.message()
    }

    #[must_use]
    pub fn controls_visible(&self) -> bool {
        self.auto_hide.is_visible()
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_fullscreen()
    }

    /// True once the window asked to close; the viewer ignores all input
    /// afterwards.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
