// arcflow-core test helpers
// Copyright (C) 2021-2026  Daniel Lambert. Licensed under GPL-3.0-or-later, see /COPYING file for details
//! Constructors shared by unit tests across modules. Not part of the public API.

use shared::Id;

use crate::types::{Playlist, VideoItem};

/// A [`VideoItem`] with a fresh id, a recognizable `youtube_id`, and the given position.
/// Belongs to a throwaway playlist id; tests that care about ownership set `playlist_id`
/// themselves.
#[must_use]
pub fn video(youtube_id: &str, position: u32) -> VideoItem {
    VideoItem {
        id: Id::new(),
        youtube_id: youtube_id.to_string(),
        title: format!("video {youtube_id}"),
        thumbnail_url: None,
        duration: None,
        added_at: shared::time_now(),
        position,
        playlist_id: Id::new(),
    }
}

/// An empty, named [`Playlist`] with a fresh id.
#[must_use]
pub fn playlist(name: &str) -> Playlist {
    Playlist {
        id: Id::new(),
        name: name.to_string(),
        description: String::new(),
        created_at: shared::time_now(),
        updated_at: shared::time_now(),
        videos: Vec::new(),
    }
}
