// SPDX-License-Identifier: MPL-2.0
//! Media session manager.
//!
//! Holds at most one [`LoadedMedia`]. Loading a new clip releases the previous
//! source first, mutes the new element, starts playback and resets progress.
//! Playback events carry the id of the source that produced them; events for
//! any id other than the active one belong to a superseded clip and are
//! dropped.

use super::{progress_fraction, ElementNotice, MediaElement, PlayableSource, SourceId, SourceRegistry};
use crate::config::INITIAL_VOLUME;
use crate::video_player::Volume;
use std::path::Path;
use std::time::Duration;

/// The active clip.
#[derive(Debug)]
pub struct LoadedMedia<E> {
    source: PlayableSource,
    element: E,
}

impl<E> LoadedMedia<E> {
    pub fn path(&self) -> &Path {
        self.source.path()
    }

    pub fn source(&self) -> &PlayableSource {
        &self.source
    }

    pub fn element(&self) -> &E {
        &self.element
    }
}

#[derive(Debug)]
pub struct MediaSession<E> {
    registry: SourceRegistry,
    current: Option<LoadedMedia<E>>,
    progress: Option<f64>,
}

impl<E> Default for MediaSession<E> {
    fn default() -> Self {
        Self {
            registry: SourceRegistry::new(),
            current: None,
            progress: None,
        }
    }
}

impl<E: MediaElement> MediaSession<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the active clip with `path` and starts it muted.
    pub fn load(&mut self, path: &Path) -> &LoadedMedia<E> {
        self.release_current();

        let source = self.registry.create(path);
        let mut element = E::open(&source);
        element.set_volume(Volume::new(INITIAL_VOLUME));
        element.play();
        self.progress = None;

        tracing::info!(id = %source.id(), path = %path.display(), "media loaded");
        self.current.insert(LoadedMedia { source, element })
    }

    #[must_use]
    pub fn current(&self) -> Option<&LoadedMedia<E>> {
        self.current.as_ref()
    }

    pub fn element_mut(&mut self) -> Option<&mut E> {
        self.current.as_mut().map(|media| &mut media.element)
    }

    #[must_use]
    pub fn active_id(&self) -> Option<SourceId> {
        self.current.as_ref().map(|media| media.source.id())
    }

    /// Fraction of the clip played, once the duration is known.
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        self.progress
    }

    /// Routes an element event. Returns `None` when `id` is not the active
    /// source.
    pub fn handle_event(&mut self, id: SourceId, event: E::Event) -> Option<ElementNotice> {
        let Some(media) = self.current.as_mut().filter(|media| media.source.id() == id) else {
            tracing::debug!(%id, "dropping event from inactive source");
            return None;
        };

        let notice = media.element.handle_event(event);
        match &notice {
            ElementNotice::Metadata | ElementNotice::TimeUpdate | ElementNotice::Ended => {
                self.refresh_progress();
            }
            ElementNotice::Error(err) => {
                tracing::warn!(%id, error = %err, "playback error");
            }
            ElementNotice::None => {}
        }
        Some(notice)
    }

    /// Seeks to `fraction` of the duration. No-op while the duration is
    /// unknown. Returns whether a seek was issued.
    pub fn seek_to_fraction(&mut self, fraction: f64) -> bool {
        let Some(element) = self.element_mut() else {
            return false;
        };
        let Some(duration) = element.duration() else {
            return false;
        };
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        element.seek(Duration::from_secs_f64(duration.as_secs_f64() * fraction));
        self.refresh_progress();
        true
    }

    /// Recomputes progress after the element's playhead moved.
    pub fn refresh_progress(&mut self) {
        self.progress = self
            .current
            .as_ref()
            .and_then(|media| progress_fraction(media.element.current_time(), media.element.duration()));
    }

    /// Releases the active clip, if any.
    pub fn unload(&mut self) {
        self.release_current();
        self.progress = None;
    }

    /// Number of sources created and not yet released.
    #[must_use]
    pub fn live_sources(&self) -> usize {
        self.registry.live_count()
    }

    fn release_current(&mut self) {
        if let Some(mut media) = self.current.take() {
            media.element.release();
            self.registry.release(&media.source);
            tracing::info!(id = %media.source.id(), "media released");
        }
    }
}
