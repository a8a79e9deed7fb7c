// SPDX-License-Identifier: MPL-2.0
//! Audio track decoding for the playing clip.
//!
//! The audio decoder runs next to the video decoder on its own blocking
//! thread and follows the same [`DecoderCommand`]s. Samples are resampled to
//! the output device's rate and channel count and queued slightly ahead of
//! their presentation time.

use super::audio_output::AudioOutputConfig;
use super::decoder::{DecoderCommand, Pacer, AV_TIME_BASE, IDLE_POLL};
use crate::error::{Error, Result, VideoError};
use ffmpeg_next::software::resampling;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Upper bound on buffers skipped while looking for a seek target.
const MAX_SEEK_FRAMES: u32 = 1000;

/// Audio is handed to the device this far ahead of its timestamp.
const AUDIO_LOOKAHEAD: Duration = Duration::from_millis(200);

/// Interleaved f32 samples at the output device format.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub samples: Arc<Vec<f32>>,
    pub channels: u16,
    pub pts_secs: f64,
}

impl DecodedAudio {
    /// Samples per channel.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }
}

#[derive(Debug, Clone)]
pub enum AudioDecoderEvent {
    BufferReady(DecodedAudio),
    EndOfStream,
    Error(String),
}

pub struct AudioDecoder {
    command_tx: mpsc::UnboundedSender<DecoderCommand>,
    event_rx: mpsc::Receiver<AudioDecoderEvent>,
}

impl AudioDecoder {
    /// Spawns the audio thread for `path`. Returns `Ok(None)` when the clip
    /// has no audio track.
    pub fn new(path: &Path, output_config: AudioOutputConfig) -> Result<Option<Self>> {
        if !path.exists() {
            return Err(Error::Io(format!("Video file not found: {}", path.display())));
        }
        if !has_audio_stream(path)? {
            return Ok(None);
        }

        let path = path.to_path_buf();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel(4);

        tokio::task::spawn_blocking(move || {
            if let Err(e) = audio_loop(&path, output_config, command_rx, &event_tx) {
                tracing::warn!(path = %path.display(), error = %e, "audio decoder stopped");
            }
        });

        Ok(Some(Self {
            command_tx,
            event_rx,
        }))
    }

    pub fn send_command(&self, command: DecoderCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| Error::Io("Audio decoder is not running".into()))
    }

    pub async fn recv_event(&mut self) -> Option<AudioDecoderEvent> {
        self.event_rx.recv().await
    }
}

fn has_audio_stream(path: &Path) -> Result<bool> {
    super::init_ffmpeg()?;

    let ictx = ffmpeg_next::format::input(&path)
        .map_err(|e| Error::Video(VideoError::from_message(&format!("Failed to open file: {e}"))))?;

    Ok(ictx
        .streams()
        .best(ffmpeg_next::media::Type::Audio)
        .is_some())
}

struct AudioStream {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Audio,
    resampler: resampling::Context,
    stream_index: usize,
    time_base: f64,
    channels: u16,
    sample_rate: u32,
    eof_sent: bool,
}

impl AudioStream {
    fn open(path: &Path, output: AudioOutputConfig) -> std::result::Result<Self, VideoError> {
        let ictx = ffmpeg_next::format::input(&path)
            .map_err(|e| VideoError::from_message(&format!("Failed to open audio: {e}")))?;
        let input = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Audio)
            .ok_or_else(|| VideoError::Other("No audio stream found".to_string()))?;
        let stream_index = input.index();
        let time_base = f64::from(input.time_base());

        let context = ffmpeg_next::codec::context::Context::from_parameters(input.parameters())
            .map_err(|e| VideoError::from_message(&format!("audio codec context: {e}")))?;
        let decoder = context
            .decoder()
            .audio()
            .map_err(|e| VideoError::from_message(&format!("audio decoder: {e}")))?;

        // Anything beyond stereo is downmixed
        let layout = if output.channels == 1 {
            ffmpeg_next::ChannelLayout::MONO
        } else {
            ffmpeg_next::ChannelLayout::STEREO
        };
        let resampler = resampling::Context::get(
            decoder.format(),
            decoder.channel_layout(),
            decoder.rate(),
            ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Packed),
            layout,
            output.sample_rate,
        )
        .map_err(|e| VideoError::DecodingFailed(format!("resampler: {e}")))?;

        Ok(Self {
            ictx,
            decoder,
            resampler,
            stream_index,
            time_base,
            channels: output.channels.clamp(1, 2),
            sample_rate: output.sample_rate,
            eof_sent: false,
        })
    }

    fn seek(&mut self, target_secs: f64) -> std::result::Result<(), VideoError> {
        let timestamp = (target_secs.max(0.0) * AV_TIME_BASE) as i64;
        self.ictx
            .seek(timestamp, ..timestamp)
            .map_err(|e| VideoError::DecodingFailed(format!("audio seek failed: {e}")))?;
        self.decoder.flush();
        self.eof_sent = false;
        Ok(())
    }

    fn next_buffer(&mut self) -> std::result::Result<Option<DecodedAudio>, VideoError> {
        let mut decoded = ffmpeg_next::frame::Audio::empty();
        loop {
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                let mut resampled = ffmpeg_next::frame::Audio::empty();
                self.resampler
                    .run(&decoded, &mut resampled)
                    .map_err(|e| VideoError::DecodingFailed(format!("resampling failed: {e}")))?;

                let count = resampled.samples() * usize::from(self.channels);
                return Ok(Some(DecodedAudio {
                    samples: Arc::new(f32_samples(resampled.data(0), count)),
                    channels: self.channels,
                    pts_secs: decoded
                        .timestamp()
                        .map_or(0.0, |pts| pts as f64 * self.time_base),
                }));
            }
            if self.eof_sent {
                return Ok(None);
            }

            let index = self.stream_index;
            let packet = self
                .ictx
                .packets()
                .find(|(stream, _)| stream.index() == index)
                .map(|(_, packet)| packet);
            match packet {
                Some(packet) => {
                    if let Err(e) = self.decoder.send_packet(&packet) {
                        tracing::debug!(error = %e, "skipping undecodable audio packet");
                    }
                }
                None => {
                    let _ = self.decoder.send_eof();
                    self.eof_sent = true;
                }
            }
        }
    }

    fn buffer_secs(&self, buffer: &DecodedAudio) -> f64 {
        buffer.frame_count() as f64 / f64::from(self.sample_rate.max(1))
    }
}

/// Reads up to `count` little-endian f32 samples.
fn f32_samples(data: &[u8], count: usize) -> Vec<f32> {
    data.chunks_exact(4)
        .take(count)
        .map(|bytes| f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        .collect()
}

fn audio_loop(
    path: &Path,
    output_config: AudioOutputConfig,
    mut command_rx: mpsc::UnboundedReceiver<DecoderCommand>,
    event_tx: &mpsc::Sender<AudioDecoderEvent>,
) -> Result<()> {
    super::init_ffmpeg()?;

    let mut stream = match AudioStream::open(path, output_config) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = event_tx.blocking_send(AudioDecoderEvent::Error(e.to_string()));
            return Err(e.into());
        }
    };

    let mut pacer = Pacer::default();
    let mut playing = false;
    let mut ended = false;
    let mut seek_target: Option<f64> = None;
    let mut skipped = 0u32;

    loop {
        loop {
            match command_rx.try_recv() {
                Ok(DecoderCommand::Play) => {
                    playing = true;
                    pacer.reset();
                }
                Ok(DecoderCommand::Pause) => {
                    playing = false;
                    pacer.reset();
                }
                Ok(DecoderCommand::Seek { target_secs }) => match stream.seek(target_secs) {
                    Ok(()) => {
                        seek_target = Some(target_secs);
                        skipped = 0;
                        ended = false;
                        pacer.reset();
                    }
                    Err(e) => {
                        seek_target = None;
                        let _ = event_tx.blocking_send(AudioDecoderEvent::Error(e.to_string()));
                    }
                },
                Ok(DecoderCommand::Stop) | Err(mpsc::error::TryRecvError::Disconnected) => {
                    return Ok(());
                }
                Err(mpsc::error::TryRecvError::Empty) => break,
            }
        }

        if ended || !playing {
            std::thread::sleep(IDLE_POLL);
            continue;
        }

        match stream.next_buffer() {
            Ok(Some(buffer)) => {
                if let Some(target) = seek_target {
                    if buffer.pts_secs + stream.buffer_secs(&buffer) < target {
                        skipped += 1;
                        if skipped >= MAX_SEEK_FRAMES {
                            tracing::debug!(target, "audio seek gave up before reaching target");
                            seek_target = None;
                        }
                        continue;
                    }
                    seek_target = None;
                }

                let wait = pacer
                    .delay(buffer.pts_secs, Instant::now())
                    .saturating_sub(AUDIO_LOOKAHEAD);
                if !wait.is_zero() {
                    std::thread::sleep(wait);
                }

                if event_tx
                    .blocking_send(AudioDecoderEvent::BufferReady(buffer))
                    .is_err()
                {
                    return Ok(());
                }
            }
            Ok(None) => {
                ended = true;
                pacer.reset();
                if event_tx.blocking_send(AudioDecoderEvent::EndOfStream).is_err() {
                    return Ok(());
                }
            }
            Err(e) => {
                let _ = event_tx.blocking_send(AudioDecoderEvent::Error(e.to_string()));
                return Err(e.into());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn frame_count_divides_by_channels() {
        let stereo = DecodedAudio {
            samples: Arc::new(vec![0.0f32; 4800]),
            channels: 2,
            pts_secs: 0.0,
        };
        assert_eq!(stereo.frame_count(), 2400);

        let mono = DecodedAudio { channels: 1, ..stereo };
        assert_eq!(mono.frame_count(), 4800);
    }

    #[test]
    fn f32_samples_decodes_little_endian() {
        let mut bytes = Vec::new();
        for value in [0.5f32, -0.25, 1.0] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }

        let samples = f32_samples(&bytes, 2);

        assert_eq!(samples.len(), 2);
        assert_abs_diff_eq!(samples[0], 0.5);
        assert_abs_diff_eq!(samples[1], -0.25);
    }

    #[test]
    fn f32_samples_ignores_trailing_bytes() {
        let mut bytes = 0.75f32.to_le_bytes().to_vec();
        bytes.push(0xff);

        assert_eq!(f32_samples(&bytes, 8), vec![0.75]);
    }

    #[tokio::test]
    async fn audio_decoder_fails_for_nonexistent_file() {
        let config = AudioOutputConfig {
            sample_rate: 48_000,
            channels: 2,
        };
        assert!(AudioDecoder::new(Path::new("/nonexistent/video.mp4"), config).is_err());
    }

    #[tokio::test]
    async fn audio_decoder_rejects_unreadable_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let video_path = temp_dir.path().join("broken.mp4");
        std::fs::write(&video_path, b"not a video").unwrap();
        let config = AudioOutputConfig {
            sample_rate: 48_000,
            channels: 2,
        };

        assert!(AudioDecoder::new(&video_path, config).is_err());
    }
}
