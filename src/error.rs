// SPDX-License-Identifier: MPL-2.0
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),
    #[error("Config Error: {0}")]
    Config(String),
    #[error("Video Error: {0}")]
    Video(#[from] VideoError),
}

/// Playback failures reported by the decoder threads.
///
/// FFmpeg only hands back free-form messages, so [`VideoError::from_message`]
/// sorts them into coarse buckets for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VideoError {
    /// Video codec is not supported by the system's FFmpeg.
    #[error("Unsupported video codec: {0}")]
    UnsupportedCodec(String),

    /// File appears corrupted or has invalid data.
    #[error("Video file is corrupted")]
    CorruptedFile,

    /// File exists but contains no video stream.
    #[error("No video stream found")]
    NoVideoStream,

    /// Decoding failed during playback.
    #[error("Decoding failed: {0}")]
    DecodingFailed(String),

    /// File not found, permission denied, etc.
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("{0}")]
    Other(String),
}

impl VideoError {
    /// Categorizes a raw FFmpeg/decoder message.
    pub fn from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();

        // Codec errors first, they may also contain "not found"
        if msg_lower.contains("codec") || msg_lower.contains("decoder") {
            if let Some(codec) = Self::extract_codec_name(&msg_lower) {
                return VideoError::UnsupportedCodec(codec);
            } else if msg_lower.contains("not found") || msg_lower.contains("unsupported") {
                return VideoError::DecodingFailed(msg.to_string());
            }
        }

        if msg_lower.contains("no such file")
            || msg_lower.contains("not found")
            || msg_lower.contains("permission denied")
            || msg_lower.contains("i/o error")
        {
            return VideoError::IoError(msg.to_string());
        }

        if msg_lower.contains("no video stream") || msg_lower.contains("invalid data found") {
            return VideoError::NoVideoStream;
        }

        if msg_lower.contains("corrupt")
            || msg_lower.contains("invalid")
            || msg_lower.contains("malformed")
        {
            return VideoError::CorruptedFile;
        }

        if msg_lower.contains("packet")
            || msg_lower.contains("scaling")
            || msg_lower.contains("resampl")
            || msg_lower.contains("seek")
            || msg_lower.contains("decode")
        {
            return VideoError::DecodingFailed(msg.to_string());
        }

        VideoError::Other(msg.to_string())
    }

    fn extract_codec_name(msg: &str) -> Option<String> {
        const CODECS: [&str; 8] = [
            "h264", "hevc", "h265", "vp8", "vp9", "av1", "mpeg4", "mpeg2",
        ];
        CODECS
            .iter()
            .find(|codec| msg.contains(*codec))
            .map(|codec| codec.to_uppercase())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
