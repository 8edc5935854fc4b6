use crate::error::ApiError;
use crate::library::{Track, TrackId};

use super::request::{Op, Outbox, RequestId};

pub const EMPTY_TITLE: &str = "No tracks available yet.";
pub const EMPTY_HINT: &str = "Check back later for new content!";
pub const LOAD_FAILED: &str = "Failed to load tracks. Please try again later.";

/// What the catalog currently shows. Exactly one of these at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogState {
    Loading,
    Failed(String),
    Ready(Vec<Track>),
}

/// The public track listing.
#[derive(Debug)]
pub struct CatalogView {
    pub state: CatalogState,
    pub cursor: usize,
    pending: Option<RequestId>,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogView {
    pub fn new() -> Self {
        Self {
            state: CatalogState::Loading,
            cursor: 0,
            pending: None,
        }
    }

    /// Request the full list. Any earlier request still in flight is
    /// forgotten.
    pub fn load(&mut self, outbox: &mut Outbox) {
        self.state = CatalogState::Loading;
        self.pending = Some(outbox.push(Op::ListTracks));
    }

    pub fn retry(&mut self, outbox: &mut Outbox) {
        self.load(outbox);
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, CatalogState::Loading)
    }

    /// Accept the list result for `id`. Returns false if the result was stale.
    pub fn receive(&mut self, id: RequestId, result: &Result<Vec<Track>, ApiError>) -> bool {
        if self.pending != Some(id) {
            return false;
        }
        self.pending = None;
        match result {
            Ok(tracks) => {
                tracing::debug!(count = tracks.len(), "catalog loaded");
                self.state = CatalogState::Ready(tracks.clone());
                self.clamp_cursor();
            }
            Err(e) => {
                tracing::warn!("error fetching tracks: {}", e.detail());
                self.state = CatalogState::Failed(LOAD_FAILED.to_string());
            }
        }
        true
    }

    pub fn tracks(&self) -> &[Track] {
        match &self.state {
            CatalogState::Ready(tracks) => tracks,
            _ => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(&self.state, CatalogState::Ready(t) if t.is_empty())
    }

    pub fn next(&mut self) {
        let len = self.tracks().len();
        if len > 0 {
            self.cursor = (self.cursor + 1).min(len - 1);
        }
    }

    pub fn prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn first(&mut self) {
        self.cursor = 0;
    }

    pub fn last(&mut self) {
        self.cursor = self.tracks().len().saturating_sub(1);
    }

    pub fn current(&self) -> Option<&Track> {
        self.tracks().get(self.cursor)
    }

    /// The track to hand to the playback controller.
    pub fn select_current(&self) -> Option<Track> {
        self.current().cloned()
    }

    pub fn is_now_playing(track: &Track, now_playing: Option<TrackId>) -> bool {
        now_playing == Some(track.id)
    }

    /// Drop a track locally (after a delete elsewhere succeeded).
    pub fn remove(&mut self, id: TrackId) {
        if let CatalogState::Ready(tracks) = &mut self.state {
            tracks.retain(|t| t.id != id);
        }
        self.clamp_cursor();
    }

    /// Replace a track locally (after a metadata update succeeded).
    pub fn replace(&mut self, track: &Track) {
        if let CatalogState::Ready(tracks) = &mut self.state {
            if let Some(slot) = tracks.iter_mut().find(|t| t.id == track.id) {
                *slot = track.clone();
            }
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.tracks().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }
}
