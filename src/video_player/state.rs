// SPDX-License-Identifier: MPL-2.0
//! Playback state of the loaded clip.
//!
//! [`VideoPlayer`] is the production [`MediaElement`]. It keeps the playhead,
//! duration and volume on the UI side and mirrors every change to the
//! playback subscription. Commands issued before the subscription reports
//! `Started` are not lost: the player replays its current intent once the
//! command sender arrives.
//!
//! After a seek the pipeline may still deliver frames decoded before it.
//! Until a frame close to the seek target arrives the playhead stays on the
//! target.

use super::subscription::{video_playback, PlaybackCommand, PlaybackCommandSender, PlaybackEvent, PlaybackMessage};
use super::Volume;
use crate::config::MAX_VOLUME;
use crate::error::VideoError;
use crate::media::{ElementNotice, MediaElement, PlayableSource, SourceId};
use crate::ui::widgets::VideoSurface;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Frames this far before a seek target already belong to it.
const SEEK_LEAD: Duration = Duration::from_millis(50);
/// Frames this far past a seek target still belong to it.
const SEEK_LAG: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackState {
    Paused,
    Playing,
    /// Reached the end; the playhead sits at the duration.
    Ended,
    Error(String),
}

#[derive(Debug)]
pub struct VideoPlayer {
    source: SourceId,
    path: PathBuf,
    state: PlaybackState,
    position: Duration,
    duration: Option<Duration>,
    /// Seek target no decoded frame has reached yet.
    pending_seek: Option<Duration>,
    volume: Volume,
    command_sender: Option<PlaybackCommandSender>,
    surface: VideoSurface,
    released: bool,
}

impl VideoPlayer {
    #[must_use]
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    #[must_use]
    pub fn source(&self) -> SourceId {
        self.source
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn surface(&self) -> &VideoSurface {
        &self.surface
    }

    #[must_use]
    pub fn has_command_sender(&self) -> bool {
        self.command_sender.is_some()
    }

    /// Playback subscription for this clip, `None` once released.
    #[must_use]
    pub fn subscription(&self) -> Option<iced::Subscription<PlaybackMessage>> {
        (!self.released).then(|| video_playback(self.source, self.path.clone()))
    }

    fn send(&self, command: PlaybackCommand) {
        if let Some(sender) = &self.command_sender {
            if let Err(e) = sender.send(command) {
                tracing::debug!(source = %self.source, error = %e, "playback command dropped");
            }
        }
    }

    fn seek_command(position: Duration) -> PlaybackCommand {
        PlaybackCommand::Seek {
            target_secs: position.as_secs_f64(),
        }
    }

    fn request_seek(&mut self, position: Duration) {
        self.position = position;
        self.pending_seek = Some(position);
        self.send(Self::seek_command(position));
    }

    /// Whether a frame at `pts` still predates the pending seek. Clears the
    /// pending target once a frame lands near it.
    fn is_stale(&mut self, pts: Duration) -> bool {
        let Some(target) = self.pending_seek else {
            return false;
        };
        let settled = pts + SEEK_LEAD >= target && pts <= target + SEEK_LAG;
        if settled {
            self.pending_seek = None;
        }
        !settled
    }

    fn clamp_to_duration(&self, position: Duration) -> Duration {
        match self.duration {
            Some(total) => position.min(total),
            None => position,
        }
    }

    /// Sends the state accumulated before the pipeline was ready.
    fn replay_intent(&self) {
        self.send(PlaybackCommand::SetVolume(self.volume));
        if !self.position.is_zero() {
            self.send(Self::seek_command(self.position));
        }
        if self.state == PlaybackState::Playing {
            self.send(PlaybackCommand::Play);
        }
    }
}

impl MediaElement for VideoPlayer {
    type Event = PlaybackEvent;

    fn open(source: &PlayableSource) -> Self {
        Self {
            source: source.id(),
            path: source.path().to_path_buf(),
            state: PlaybackState::Paused,
            position: Duration::ZERO,
            duration: None,
            pending_seek: None,
            volume: Volume::new(MAX_VOLUME),
            command_sender: None,
            surface: VideoSurface::new(),
            released: false,
        }
    }

    fn current_time(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn volume(&self) -> Volume {
        self.volume
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
        self.send(PlaybackCommand::SetVolume(volume));
    }

    fn is_paused(&self) -> bool {
        self.state != PlaybackState::Playing
    }

    fn play(&mut self) {
        match self.state {
            PlaybackState::Playing | PlaybackState::Error(_) => return,
            PlaybackState::Ended => self.request_seek(Duration::ZERO),
            PlaybackState::Paused => {}
        }
        self.state = PlaybackState::Playing;
        self.send(PlaybackCommand::Play);
    }

    fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
            self.send(PlaybackCommand::Pause);
        }
    }

    fn seek(&mut self, target: Duration) {
        if matches!(self.state, PlaybackState::Error(_)) {
            return;
        }
        if self.state == PlaybackState::Ended {
            self.state = PlaybackState::Paused;
        }
        let position = self.clamp_to_duration(target);
        self.request_seek(position);
    }

    fn release(&mut self) {
        self.send(PlaybackCommand::Stop);
        self.command_sender = None;
        self.surface.clear();
        self.state = PlaybackState::Paused;
        self.released = true;
    }

    fn handle_event(&mut self, event: PlaybackEvent) -> ElementNotice {
        if self.released {
            return ElementNotice::None;
        }

        match event {
            PlaybackEvent::Started(sender) => {
                self.command_sender = Some(sender);
                self.replay_intent();
                ElementNotice::None
            }
            PlaybackEvent::Opened {
                duration_secs,
                width,
                height,
            } => {
                tracing::debug!(source = %self.source, width, height, ?duration_secs, "clip opened");
                self.duration = duration_secs
                    .filter(|secs| secs.is_finite() && *secs > 0.0)
                    .map(Duration::from_secs_f64);
                self.position = self.clamp_to_duration(self.position);
                ElementNotice::Metadata
            }
            PlaybackEvent::FrameReady {
                rgba_data,
                width,
                height,
                pts_secs,
            } => {
                let pts = Duration::try_from_secs_f64(pts_secs).unwrap_or(Duration::ZERO);
                if self.is_stale(pts) {
                    return ElementNotice::None;
                }
                self.surface.set_frame(rgba_data, width, height);
                if self.state == PlaybackState::Ended {
                    return ElementNotice::None;
                }
                self.position = self.clamp_to_duration(pts);
                ElementNotice::TimeUpdate
            }
            PlaybackEvent::EndOfStream => {
                self.pending_seek = None;
                self.state = PlaybackState::Ended;
                if let Some(total) = self.duration {
                    self.position = total;
                }
                ElementNotice::Ended
            }
            PlaybackEvent::Error(message) => {
                let error = VideoError::from_message(&message);
                self.pending_seek = None;
                self.state = PlaybackState::Error(message);
                ElementNotice::Error(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::SourceRegistry;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn player() -> VideoPlayer {
        let source = SourceRegistry::new().create(Path::new("clip.mp4"));
        VideoPlayer::open(&source)
    }

    fn connect(player: &mut VideoPlayer) -> mpsc::UnboundedReceiver<PlaybackCommand> {
        let (tx, rx) = mpsc::unbounded_channel();
        player.handle_event(PlaybackEvent::Started(PlaybackCommandSender::new(tx)));
        rx
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<PlaybackCommand>) -> Vec<PlaybackCommand> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    fn open_with_duration(player: &mut VideoPlayer, secs: f64) {
        player.handle_event(PlaybackEvent::Opened {
            duration_secs: Some(secs),
            width: 4,
            height: 4,
        });
    }

    #[test]
    fn opens_paused_at_zero() {
        let player = player();
        assert!(player.is_paused());
        assert_eq!(player.current_time(), Duration::ZERO);
        assert_eq!(player.duration(), None);
        assert!(player.subscription().is_some());
    }

    #[test]
    fn intent_before_start_is_replayed() {
        let mut player = player();
        player.set_volume(Volume::new(0.0));
        player.play();

        let mut rx = connect(&mut player);

        assert_eq!(
            drain(&mut rx),
            vec![PlaybackCommand::SetVolume(Volume::new(0.0)), PlaybackCommand::Play]
        );
    }

    #[test]
    fn replay_includes_pending_seek() {
        let mut player = player();
        player.seek(Duration::from_secs(4));

        let mut rx = connect(&mut player);

        let commands = drain(&mut rx);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[1], PlaybackCommand::Seek { target_secs: 4.0 });
    }

    #[test]
    fn seek_clamps_to_duration() {
        let mut player = player();
        open_with_duration(&mut player, 10.0);

        player.seek(Duration::from_secs(30));

        assert_eq!(player.current_time(), Duration::from_secs(10));
    }

    fn frame(pts_secs: f64) -> PlaybackEvent {
        PlaybackEvent::FrameReady {
            rgba_data: Arc::new(vec![0; 64]),
            width: 4,
            height: 4,
            pts_secs,
        }
    }

    #[test]
    fn frames_from_before_seek_keep_the_target() {
        let mut player = player();
        open_with_duration(&mut player, 60.0);
        player.handle_event(frame(10.0));

        player.seek(Duration::from_secs(20));

        assert_eq!(player.handle_event(frame(10.04)), ElementNotice::None);
        assert_eq!(player.current_time(), Duration::from_secs(20));
    }

    #[test]
    fn frame_near_target_resumes_tracking() {
        let mut player = player();
        open_with_duration(&mut player, 60.0);
        player.seek(Duration::from_secs(20));
        player.handle_event(frame(19.0));

        assert_eq!(player.handle_event(frame(20.02)), ElementNotice::TimeUpdate);
        assert_eq!(player.current_time(), Duration::from_secs_f64(20.02));

        assert_eq!(player.handle_event(frame(25.0)), ElementNotice::TimeUpdate);
        assert_eq!(player.current_time(), Duration::from_secs(25));
    }

    #[test]
    fn backward_seek_ignores_later_frames() {
        let mut player = player();
        open_with_duration(&mut player, 60.0);
        player.handle_event(frame(30.0));

        player.seek(Duration::from_secs(5));

        assert_eq!(player.handle_event(frame(30.04)), ElementNotice::None);
        assert_eq!(player.current_time(), Duration::from_secs(5));
    }

    #[test]
    fn frames_advance_the_playhead() {
        let mut player = player();
        open_with_duration(&mut player, 10.0);

        let notice = player.handle_event(PlaybackEvent::FrameReady {
            rgba_data: Arc::new(vec![0; 64]),
            width: 4,
            height: 4,
            pts_secs: 2.5,
        });

        assert_eq!(notice, ElementNotice::TimeUpdate);
        assert_eq!(player.current_time(), Duration::from_secs_f64(2.5));
        assert!(player.surface().has_frame());
    }

    #[test]
    fn play_after_end_restarts() {
        let mut player = player();
        open_with_duration(&mut player, 10.0);
        let mut rx = connect(&mut player);
        player.play();
        assert_eq!(player.handle_event(PlaybackEvent::EndOfStream), ElementNotice::Ended);
        assert!(player.is_paused());
        assert_eq!(player.current_time(), Duration::from_secs(10));
        drain(&mut rx);

        player.play();

        assert_eq!(player.current_time(), Duration::ZERO);
        assert_eq!(
            drain(&mut rx),
            vec![PlaybackCommand::Seek { target_secs: 0.0 }, PlaybackCommand::Play]
        );
    }

    #[test]
    fn seek_after_end_pauses() {
        let mut player = player();
        open_with_duration(&mut player, 10.0);
        player.handle_event(PlaybackEvent::EndOfStream);

        player.seek(Duration::from_secs(3));

        assert_eq!(player.state(), &PlaybackState::Paused);
    }

    #[test]
    fn error_is_reported_and_blocks_play() {
        let mut player = player();

        let notice = player.handle_event(PlaybackEvent::Error("Invalid data found".into()));

        assert!(matches!(notice, ElementNotice::Error(_)));
        player.play();
        assert!(player.is_paused());
    }

    #[test]
    fn release_stops_pipeline() {
        let mut player = player();
        let mut rx = connect(&mut player);
        drain(&mut rx);

        player.release();

        assert_eq!(drain(&mut rx), vec![PlaybackCommand::Stop]);
        assert!(!player.has_command_sender());
        assert!(player.subscription().is_none());
        assert_eq!(
            player.handle_event(PlaybackEvent::EndOfStream),
            ElementNotice::None
        );
    }

    #[test]
    fn unknown_duration_is_ignored() {
        let mut player = player();
        player.handle_event(PlaybackEvent::Opened {
            duration_secs: Some(f64::NAN),
            width: 4,
            height: 4,
        });
        assert_eq!(player.duration(), None);
    }
}
