// SPDX-License-Identifier: MPL-2.0
//! Iced subscription bridging the decoder threads and the UI loop.
//!
//! One subscription runs per loaded source. It spawns the video decoder, the
//! optional audio decoder and the audio output, then forwards
//! [`PlaybackCommand`]s to all three and relays their events as
//! [`PlaybackMessage`]s tagged with the source id. Dropping the subscription
//! drops every channel, which stops the decoder threads.

use super::audio::{AudioDecoder, AudioDecoderEvent};
use super::audio_output::AudioOutput;
use super::decoder::{AsyncDecoder, DecoderCommand, DecoderEvent};
use super::Volume;
use crate::error::{Error, Result};
use crate::media::SourceId;
use iced::futures::{SinkExt, Stream};
use iced::stream;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCommand {
    Play,
    Pause,
    Seek { target_secs: f64 },
    SetVolume(Volume),
    Stop,
}

/// Cloneable handle used by [`super::VideoPlayer`] to steer playback.
#[derive(Clone)]
pub struct PlaybackCommandSender(mpsc::UnboundedSender<PlaybackCommand>);

impl PlaybackCommandSender {
    pub(crate) fn new(tx: mpsc::UnboundedSender<PlaybackCommand>) -> Self {
        Self(tx)
    }

    pub fn send(&self, command: PlaybackCommand) -> Result<()> {
        self.0
            .send(command)
            .map_err(|_| Error::Io("Playback subscription is not running".into()))
    }
}

impl std::fmt::Debug for PlaybackCommandSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackCommandSender")
            .field("closed", &self.0.is_closed())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum PlaybackEvent {
    /// The pipeline is up and accepts commands.
    Started(PlaybackCommandSender),
    Opened {
        duration_secs: Option<f64>,
        width: u32,
        height: u32,
    },
    FrameReady {
        rgba_data: Arc<Vec<u8>>,
        width: u32,
        height: u32,
        pts_secs: f64,
    },
    EndOfStream,
    Error(String),
}

impl From<DecoderEvent> for PlaybackEvent {
    fn from(event: DecoderEvent) -> Self {
        match event {
            DecoderEvent::Opened {
                duration_secs,
                width,
                height,
            } => Self::Opened {
                duration_secs,
                width,
                height,
            },
            DecoderEvent::FrameReady(frame) => Self::FrameReady {
                rgba_data: frame.rgba_data,
                width: frame.width,
                height: frame.height,
                pts_secs: frame.pts_secs,
            },
            DecoderEvent::EndOfStream => Self::EndOfStream,
            DecoderEvent::Error(message) => Self::Error(message),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlaybackMessage {
    pub source: SourceId,
    pub event: PlaybackEvent,
}

/// Identity of a playback subscription. A new source id restarts the
/// pipeline even for the same path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PlaybackRequest {
    source: SourceId,
    path: PathBuf,
}

pub fn video_playback(source: SourceId, path: PathBuf) -> iced::Subscription<PlaybackMessage> {
    iced::Subscription::run_with(PlaybackRequest { source, path }, playback_stream)
}

/// Audio half of the pipeline, present when the clip has an audio track and
/// an output device is available.
struct AudioPipeline {
    decoder: AudioDecoder,
    output: AudioOutput,
}

impl AudioPipeline {
    fn start(path: &std::path::Path) -> Option<Self> {
        let output = match AudioOutput::new(Volume::default()) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(error = %e, "audio output unavailable, playing without sound");
                return None;
            }
        };
        match AudioDecoder::new(path, output.config()) {
            Ok(Some(decoder)) => Some(Self { decoder, output }),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "audio decoder failed, playing without sound");
                None
            }
        }
    }

    fn apply(&self, command: &PlaybackCommand) {
        let forwarded = match command {
            PlaybackCommand::Play => {
                let _ = self.output.resume();
                Some(DecoderCommand::Play)
            }
            PlaybackCommand::Pause => {
                let _ = self.output.pause();
                Some(DecoderCommand::Pause)
            }
            PlaybackCommand::Seek { target_secs } => {
                let _ = self.output.clear_buffer();
                Some(DecoderCommand::Seek {
                    target_secs: *target_secs,
                })
            }
            PlaybackCommand::SetVolume(volume) => {
                let _ = self.output.set_volume(*volume);
                None
            }
            PlaybackCommand::Stop => {
                let _ = self.output.stop();
                Some(DecoderCommand::Stop)
            }
        };
        if let Some(command) = forwarded {
            let _ = self.decoder.send_command(command);
        }
    }
}

/// Video decoder command for a playback command, if it concerns video.
fn video_command(command: &PlaybackCommand) -> Option<DecoderCommand> {
    match command {
        PlaybackCommand::Play => Some(DecoderCommand::Play),
        PlaybackCommand::Pause => Some(DecoderCommand::Pause),
        PlaybackCommand::Seek { target_secs } => Some(DecoderCommand::Seek {
            target_secs: *target_secs,
        }),
        PlaybackCommand::Stop => Some(DecoderCommand::Stop),
        PlaybackCommand::SetVolume(_) => None,
    }
}

fn playback_stream(request: &PlaybackRequest) -> impl Stream<Item = PlaybackMessage> {
    let PlaybackRequest { source, path } = request.clone();

    stream::channel(100, move |mut output| async move {
        run_pipeline(source, &path, &mut output).await;
        tracing::debug!(%source, "playback pipeline stopped");
        // Keep the subscription alive but idle
        std::future::pending::<()>().await;
    })
}

async fn run_pipeline(
    source: SourceId,
    path: &std::path::Path,
    output: &mut iced::futures::channel::mpsc::Sender<PlaybackMessage>,
) {
    let message = |event| PlaybackMessage { source, event };

    let decoder = match AsyncDecoder::new(path) {
        Ok(decoder) => decoder,
        Err(e) => {
            let _ = output.send(message(PlaybackEvent::Error(e.to_string()))).await;
            return;
        }
    };
    let (video_tx, mut video_rx) = decoder.into_channels();
    let mut audio = AudioPipeline::start(path);

    let (command_tx, mut command_rx) = mpsc::unbounded_channel();
    let _ = output
        .send(message(PlaybackEvent::Started(PlaybackCommandSender::new(command_tx))))
        .await;
    tracing::debug!(%source, has_audio = audio.is_some(), "playback pipeline started");

    loop {
        tokio::select! {
            command = command_rx.recv() => {
                let command = command.unwrap_or(PlaybackCommand::Stop);
                if let Some(audio) = &audio {
                    audio.apply(&command);
                }
                if let Some(video_command) = video_command(&command) {
                    let _ = video_tx.send(video_command);
                }
                if command == PlaybackCommand::Stop {
                    break;
                }
            }

            event = video_rx.recv() => {
                let Some(event) = event else {
                    break;
                };
                if output.send(message(event.into())).await.is_err() {
                    break;
                }
            }

            Some(event) = async {
                match audio.as_mut() {
                    Some(audio) => audio.decoder.recv_event().await,
                    None => std::future::pending::<Option<AudioDecoderEvent>>().await,
                }
            } => {
                match event {
                    AudioDecoderEvent::BufferReady(buffer) => {
                        if let Some(audio) = &audio {
                            let _ = audio.output.play(buffer.samples);
                        }
                    }
                    AudioDecoderEvent::EndOfStream => {}
                    AudioDecoderEvent::Error(e) => {
                        tracing::warn!(%source, error = %e, "audio playback failed");
                        audio = None;
                    }
                }
            }
        }
    }
}
