// SPDX-License-Identifier: MPL-2.0
//! Video frame decoder running on a blocking Tokio thread.
//!
//! The decoder owns every FFmpeg object of the clip. It receives commands on
//! an unbounded channel and delivers RGBA frames on a channel with capacity 2,
//! so a slow UI throttles decoding instead of piling up frames.

use crate::error::{Error, Result, VideoError};
use ffmpeg_next::software::scaling;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// FFmpeg container durations are expressed in microseconds.
pub(super) const AV_TIME_BASE: f64 = 1_000_000.0;

/// Sleep between command polls while nothing needs decoding.
pub(super) const IDLE_POLL: Duration = Duration::from_millis(10);

/// Frames this close before a seek target are shown instead of skipped.
const SEEK_TOLERANCE_SECS: f64 = 0.001;

#[derive(Debug, Clone)]
pub struct DecodedFrame {
    /// RGBA pixel data, `width * height * 4` bytes.
    pub rgba_data: Arc<Vec<u8>>,
    pub width: u32,
    pub height: u32,
    /// Presentation timestamp in seconds.
    pub pts_secs: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecoderCommand {
    Play,
    Pause,
    /// Jump to `target_secs`. A paused decoder shows the frame at the target.
    Seek { target_secs: f64 },
    Stop,
}

#[derive(Debug, Clone)]
pub enum DecoderEvent {
    /// The clip was opened; always the first event.
    Opened {
        duration_secs: Option<f64>,
        width: u32,
        height: u32,
    },
    FrameReady(DecodedFrame),
    EndOfStream,
    Error(String),
}

/// Channel handles of a running decoder thread.
pub struct AsyncDecoder {
    command_tx: mpsc::UnboundedSender<DecoderCommand>,
    event_rx: mpsc::Receiver<DecoderEvent>,
}

impl AsyncDecoder {
    /// Spawns the decoder thread for `path`.
    ///
    /// Only the existence of the file is checked here. Open failures arrive
    /// as [`DecoderEvent::Error`].
    pub fn new(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Io(format!("Video file not found: {}", path.display())));
        }

        let path = path.to_path_buf();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel(2);

        tokio::task::spawn_blocking(move || {
            if let Err(e) = decode_loop(&path, command_rx, &event_tx) {
                tracing::warn!(path = %path.display(), error = %e, "video decoder stopped");
            }
        });

        Ok(Self {
            command_tx,
            event_rx,
        })
    }

    pub fn send_command(&self, command: DecoderCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|_| Error::Io("Video decoder is not running".into()))
    }

    /// Next event, or `None` once the decoder thread has exited.
    pub async fn recv_event(&mut self) -> Option<DecoderEvent> {
        self.event_rx.recv().await
    }

    /// Separates the command and event halves.
    pub fn into_channels(
        self,
    ) -> (
        mpsc::UnboundedSender<DecoderCommand>,
        mpsc::Receiver<DecoderEvent>,
    ) {
        (self.command_tx, self.event_rx)
    }
}

/// Open FFmpeg state of one clip.
struct VideoStream {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: scaling::Context,
    stream_index: usize,
    time_base: f64,
    duration_secs: Option<f64>,
    width: u32,
    height: u32,
    eof_sent: bool,
}

impl VideoStream {
    fn open(path: &Path) -> std::result::Result<Self, VideoError> {
        let ictx = ffmpeg_next::format::input(&path)
            .map_err(|e| VideoError::from_message(&format!("Failed to open video: {e}")))?;

        let input = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or(VideoError::NoVideoStream)?;
        let stream_index = input.index();
        let time_base = f64::from(input.time_base());
        let duration_secs = clip_duration_secs(input.duration(), time_base, ictx.duration());

        let context = ffmpeg_next::codec::context::Context::from_parameters(input.parameters())
            .map_err(|e| VideoError::from_message(&format!("codec context: {e}")))?;
        let decoder = context
            .decoder()
            .video()
            .map_err(|e| VideoError::from_message(&format!("video decoder: {e}")))?;

        let width = decoder.width();
        let height = decoder.height();
        let scaler = scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGBA,
            width,
            height,
            scaling::Flags::BILINEAR,
        )
        .map_err(|e| VideoError::DecodingFailed(format!("scaler: {e}")))?;

        Ok(Self {
            ictx,
            decoder,
            scaler,
            stream_index,
            time_base,
            duration_secs,
            width,
            height,
            eof_sent: false,
        })
    }

    fn seek(&mut self, target_secs: f64) -> std::result::Result<(), VideoError> {
        let timestamp = (target_secs.max(0.0) * AV_TIME_BASE) as i64;
        // Open upper bound lets FFmpeg land on the keyframe before the target
        self.ictx
            .seek(timestamp, ..timestamp)
            .map_err(|e| VideoError::DecodingFailed(format!("seek failed: {e}")))?;
        self.decoder.flush();
        self.eof_sent = false;
        Ok(())
    }

    /// Decodes the next frame; `None` at end of stream.
    fn next_frame(&mut self) -> std::result::Result<Option<DecodedFrame>, VideoError> {
        let mut decoded = ffmpeg_next::frame::Video::empty();
        loop {
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                return self.convert(&decoded).map(Some);
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
                        tracing::debug!(error = %e, "skipping undecodable packet");
                    }
                }
                None => {
                    // Drain frames still buffered inside the codec
                    let _ = self.decoder.send_eof();
                    self.eof_sent = true;
                }
            }
        }
    }

    fn convert(
        &mut self,
        decoded: &ffmpeg_next::frame::Video,
    ) -> std::result::Result<DecodedFrame, VideoError> {
        let mut rgba = ffmpeg_next::frame::Video::empty();
        self.scaler
            .run(decoded, &mut rgba)
            .map_err(|e| VideoError::DecodingFailed(format!("scaling failed: {e}")))?;

        let pts_secs = decoded
            .timestamp()
            .map_or(0.0, |pts| pts as f64 * self.time_base);

        Ok(DecodedFrame {
            rgba_data: Arc::new(packed_rows(
                rgba.data(0),
                rgba.stride(0),
                self.width as usize * 4,
                self.height as usize,
            )),
            width: self.width,
            height: self.height,
            pts_secs,
        })
    }
}

/// Copies `height` rows of `row_len` bytes out of a buffer whose rows are
/// `stride` bytes apart.
fn packed_rows(data: &[u8], stride: usize, row_len: usize, height: usize) -> Vec<u8> {
    let mut packed = Vec::with_capacity(row_len * height);
    for row in data.chunks(stride.max(1)).take(height) {
        packed.extend_from_slice(&row[..row_len.min(row.len())]);
    }
    packed
}

/// Stream duration converted to seconds, falling back to the container
/// duration when the stream does not carry one.
fn clip_duration_secs(stream_duration: i64, time_base: f64, container_duration: i64) -> Option<f64> {
    if stream_duration > 0 {
        Some(stream_duration as f64 * time_base)
    } else if container_duration > 0 {
        Some(container_duration as f64 / AV_TIME_BASE)
    } else {
        None
    }
}

/// Wall clock pacing anchored at the first frame after play or seek.
#[derive(Debug, Default)]
pub(super) struct Pacer {
    anchor: Option<(Instant, f64)>,
}

impl Pacer {
    pub(super) fn reset(&mut self) {
        self.anchor = None;
    }

    /// How long to wait before showing the frame at `pts_secs`.
    pub(super) fn delay(&mut self, pts_secs: f64, now: Instant) -> Duration {
        let (start, first_pts) = *self.anchor.get_or_insert((now, pts_secs));
        let due = start + Duration::from_secs_f64((pts_secs - first_pts).max(0.0));
        due.saturating_duration_since(now)
    }
}

fn decode_loop(
    path: &Path,
    mut command_rx: mpsc::UnboundedReceiver<DecoderCommand>,
    event_tx: &mpsc::Sender<DecoderEvent>,
) -> Result<()> {
    super::init_ffmpeg()?;

    let mut stream = match VideoStream::open(path) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = event_tx.blocking_send(DecoderEvent::Error(e.to_string()));
            return Err(e.into());
        }
    };

    let opened = DecoderEvent::Opened {
        duration_secs: stream.duration_secs,
        width: stream.width,
        height: stream.height,
    };
    if event_tx.blocking_send(opened).is_err() {
        return Ok(());
    }

    let mut pacer = Pacer::default();
    let mut playing = false;
    // Show the first frame before playback starts
    let mut show_one = true;
    let mut ended = false;
    let mut skip_before: Option<f64> = None;

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
                        skip_before = Some(target_secs);
                        show_one = !playing;
                        ended = false;
                        pacer.reset();
                    }
                    Err(e) => {
                        let _ = event_tx.blocking_send(DecoderEvent::Error(e.to_string()));
                    }
                },
                Ok(DecoderCommand::Stop) | Err(mpsc::error::TryRecvError::Disconnected) => {
                    return Ok(());
                }
                Err(mpsc::error::TryRecvError::Empty) => break,
            }
        }

        if ended || !(playing || show_one) {
            std::thread::sleep(IDLE_POLL);
            continue;
        }

        match stream.next_frame() {
            Ok(Some(frame)) => {
                if skip_before.is_some_and(|target| frame.pts_secs + SEEK_TOLERANCE_SECS < target)
                {
                    continue;
                }
                skip_before = None;
                show_one = false;

                if playing {
                    let wait = pacer.delay(frame.pts_secs, Instant::now());
                    if !wait.is_zero() {
                        std::thread::sleep(wait);
                    }
                }

                if event_tx.blocking_send(DecoderEvent::FrameReady(frame)).is_err() {
                    return Ok(());
                }
            }
            Ok(None) => {
                ended = true;
                playing = false;
                show_one = false;
                skip_before = None;
                pacer.reset();
                if event_tx.blocking_send(DecoderEvent::EndOfStream).is_err() {
                    return Ok(());
                }
            }
            Err(e) => {
                let _ = event_tx.blocking_send(DecoderEvent::Error(e.to_string()));
                return Err(e.into());
            }
        }
    }
}
