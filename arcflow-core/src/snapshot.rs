// arcflow-core queue snapshot
// Copyright (C) 2021-2026  Daniel Lambert. Licensed under GPL-3.0-or-later, see /COPYING file for details
//! Immutable capture-and-restore of the undoable slice of [`QueueState`] (§3, §9).
//!
//! Only the fields an `Undoable` action can change are captured: the selected playlist,
//! the video list (with positions), and the playback cursor. Shuffle order, playback
//! history, and the undo stacks themselves are not part of the undo domain — navigation
//! and shuffle/repeat toggles are `PlaybackTransient` (§4.2) and never enter history.

use crate::types::{PlaylistId, QueueState, VideoId, VideoItem};

/// A point-in-time capture of the undoable portion of a [`QueueState`].
#[derive(Debug, Clone, PartialEq)]
pub struct QueueSnapshot {
    selected_playlist_id: Option<PlaylistId>,
    videos: Vec<VideoItem>,
    current_index: Option<usize>,
    current_item_id: Option<VideoId>,
}

impl QueueSnapshot {
    /// Captures the undoable fields of `queue`.
    #[must_use]
    pub fn capture(queue: &QueueState) -> Self {
        Self {
            selected_playlist_id: queue.selected_playlist_id,
            videos: queue.videos.clone(),
            current_index: queue.current_index,
            current_item_id: queue.current_item_id,
        }
    }

    /// Restores this snapshot's fields onto `queue`, leaving every other field
    /// (shuffle order, playback history, repeat mode, the undo stacks themselves)
    /// untouched — the caller is responsible for stack bookkeeping.
    #[must_use]
    pub fn restore(self, queue: QueueState) -> QueueState {
        QueueState {
            selected_playlist_id: self.selected_playlist_id,
            videos: self.videos,
            current_index: self.current_index,
            current_item_id: self.current_item_id,
            ..queue
        }
    }
}
