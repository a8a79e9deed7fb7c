// SPDX-License-Identifier: MPL-2.0
//! Drop zone: picks the first video of each drag gesture.
//!
//! The window reports one drop event per file. Entries of the same gesture
//! arrive back to back; a gesture ends when a new hover starts after drops,
//! when the hover leaves the window, or on any pointer or keyboard input.

use crate::media;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Hovering,
    Dropping { accepted: bool },
}

/// Outcome of one dropped entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropDecision {
    Accept(PathBuf),
    NotVideo,
    /// The gesture already produced a video.
    AlreadyAccepted,
}

#[derive(Debug, Clone, Default)]
pub struct DropZone {
    phase: Phase,
}

impl DropZone {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Any hover after drops opens a new gesture.
    pub fn file_hovered(&mut self) {
        self.phase = Phase::Hovering;
    }

    pub fn hover_left(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Ends the current gesture.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }

    pub fn file_dropped(&mut self, path: &Path) -> DropDecision {
        let accepted = match self.phase {
            Phase::Dropping { accepted } => accepted,
            Phase::Idle | Phase::Hovering => false,
        };

        if accepted {
            tracing::debug!(path = %path.display(), "ignoring extra entry of drop gesture");
            self.phase = Phase::Dropping { accepted };
            return DropDecision::AlreadyAccepted;
        }

        if media::is_video(path) {
            self.phase = Phase::Dropping { accepted: true };
            tracing::debug!(path = %path.display(), "drop accepted");
            DropDecision::Accept(path.to_path_buf())
        } else {
            self.phase = Phase::Dropping { accepted: false };
            tracing::debug!(path = %path.display(), "drop ignored, not a video");
            DropDecision::NotVideo
        }
    }

    /// Treats `path` as a gesture with a single entry.
    pub fn single(&mut self, path: &Path) -> DropDecision {
        self.reset();
        let decision = self.file_dropped(path);
        self.reset();
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_video_of_gesture_wins() {
        let mut zone = DropZone::new();
        zone.file_hovered();
        zone.file_hovered();
        zone.file_hovered();

        assert_eq!(zone.file_dropped(Path::new("notes.txt")), DropDecision::NotVideo);
        assert_eq!(
            zone.file_dropped(Path::new("a.mp4")),
            DropDecision::Accept(PathBuf::from("a.mp4"))
        );
        assert_eq!(zone.file_dropped(Path::new("b.mkv")), DropDecision::AlreadyAccepted);
    }

    #[test]
    fn new_hover_starts_new_gesture() {
        let mut zone = DropZone::new();
        zone.file_hovered();
        zone.file_dropped(Path::new("a.mp4"));

        zone.file_hovered();
        assert_eq!(
            zone.file_dropped(Path::new("b.mp4")),
            DropDecision::Accept(PathBuf::from("b.mp4"))
        );
    }

    #[test]
    fn reset_starts_new_gesture() {
        let mut zone = DropZone::new();
        zone.file_dropped(Path::new("a.mp4"));
        zone.reset();

        assert!(matches!(zone.file_dropped(Path::new("b.mp4")), DropDecision::Accept(_)));
    }

    #[test]
    fn hover_left_abandons_gesture() {
        let mut zone = DropZone::new();
        zone.file_hovered();
        zone.hover_left();

        assert!(matches!(zone.file_dropped(Path::new("a.webm")), DropDecision::Accept(_)));
    }

    #[test]
    fn single_entry_gesture_does_not_block_next_drop() {
        let mut zone = DropZone::new();

        assert!(matches!(zone.single(Path::new("a.mov")), DropDecision::Accept(_)));
        assert!(matches!(zone.file_dropped(Path::new("b.mov")), DropDecision::Accept(_)));
    }

    #[test]
    fn gesture_without_video_changes_nothing() {
        let mut zone = DropZone::new();
        zone.file_hovered();

        assert_eq!(zone.file_dropped(Path::new("a.png")), DropDecision::NotVideo);
        assert_eq!(zone.file_dropped(Path::new("b.pdf")), DropDecision::NotVideo);
    }
}
