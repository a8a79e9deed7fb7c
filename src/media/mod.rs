// SPDX-License-Identifier: MPL-2.0
//! Loaded media: playable sources, the media element port, and the session
//! that owns the single active clip.

pub mod element;
pub mod session;
pub mod source;

pub use element::{progress_fraction, ElementNotice, MediaElement};
pub use session::{LoadedMedia, MediaSession};
pub use source::{PlayableSource, SourceId, SourceRegistry};

use std::path::Path;

/// Supported media extensions
pub mod extensions {
    /// Video file extensions with the content type reported for them.
    pub const VIDEO_CONTENT_TYPES: &[(&str, &str)] = &[
        ("mp4", "video/mp4"),
        ("m4v", "video/x-m4v"),
        ("avi", "video/x-msvideo"),
        ("mov", "video/quicktime"),
        ("mkv", "video/x-matroska"),
        ("webm", "video/webm"),
    ];
}

/// Content type derived from the file extension, if it is a known one.
///
/// ```
/// use dropplay::media::content_type;
/// use std::path::Path;
///
/// assert_eq!(content_type(Path::new("clip.MKV")), Some("video/x-matroska"));
/// assert_eq!(content_type(Path::new("notes.txt")), None);
/// ```
pub fn content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    extensions::VIDEO_CONTENT_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, content_type)| *content_type)
}

/// True when the dropped entry is a file whose content type is `video/*`.
pub fn is_video(path: &Path) -> bool {
    !path.is_dir() && content_type(path).is_some_and(|kind| kind.starts_with("video/"))
}
