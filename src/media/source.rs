// SPDX-License-Identifier: MPL-2.0
//! Playable handles issued for dropped files.
//!
//! Every accepted drop gets a fresh [`PlayableSource`] from the
//! [`SourceRegistry`]. The handle's id tags the playback subscription and
//! every event it produces, and it must be released exactly once when the
//! clip is replaced or the window closes.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source#{}", self.0)
    }
}

/// A file registered for playback. Not `Clone`: one handle, one release.
#[derive(Debug, PartialEq, Eq)]
pub struct PlayableSource {
    id: SourceId,
    path: PathBuf,
}

impl PlayableSource {
    #[must_use]
    pub fn id(&self) -> SourceId {
        self.id
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Issues and tracks live [`PlayableSource`] handles.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    next_id: u64,
    live: HashSet<SourceId>,
}

impl SourceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, path: &Path) -> PlayableSource {
        self.next_id += 1;
        let id = SourceId(self.next_id);
        self.live.insert(id);
        tracing::debug!(%id, path = %path.display(), "playable source created");
        PlayableSource {
            id,
            path: path.to_path_buf(),
        }
    }

    /// Releases a handle. Returns `false` if it was not live.
    pub fn release(&mut self, source: &PlayableSource) -> bool {
        let released = self.live.remove(&source.id);
        if released {
            tracing::debug!(id = %source.id, "playable source released");
        } else {
            tracing::warn!(id = %source.id, "playable source released twice");
        }
        released
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
