// SPDX-License-Identifier: MPL-2.0
//! Video playback engine for DropPlay.
//!
//! FFmpeg decodes video and audio on blocking Tokio threads, cpal plays the
//! audio, and an Iced subscription relays frames to the UI.

pub mod audio;
pub mod audio_output;
mod decoder;
mod state;
pub mod subscription;
pub mod volume;

pub use decoder::{AsyncDecoder, DecodedFrame, DecoderCommand, DecoderEvent};
pub use state::{PlaybackState, VideoPlayer};
pub use subscription::{video_playback, PlaybackCommand, PlaybackCommandSender, PlaybackEvent, PlaybackMessage};
pub use volume::Volume;

use crate::error::{Error, Result};
use std::sync::Once;

static FFMPEG_INIT: Once = Once::new();

/// Initializes FFmpeg once per process and silences its warning output.
pub fn init_ffmpeg() -> Result<()> {
    let mut result = Ok(());

    FFMPEG_INIT.call_once(|| {
        if let Err(e) = ffmpeg_next::init() {
            result = Err(Error::Io(format!("FFmpeg initialization failed: {e}")));
            return;
        }

        // SAFETY: av_log_set_level only changes FFmpeg's global log threshold
        unsafe {
            ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
        }
    });

    result
}
