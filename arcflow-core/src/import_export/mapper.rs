// arcflow-core import/export mapper
// Copyright (C) 2021-2026  Daniel Lambert. Licensed under GPL-3.0-or-later, see /COPYING file for details
//! Domain ↔ DTO conversions for the import/export envelope (§4.5).

use shared::Id;

use crate::import_export::envelope::{Envelope, PlaylistDto, VideoDto, SCHEMA_VERSION};
use crate::types::{Playlist, VideoItem};

/// Maps loaded playlists (videos already ordered by `position`) into an export envelope.
#[must_use]
pub fn playlists_to_envelope(
    playlists: &[Playlist],
    selected_playlist_id: Option<Id>,
    exported_at_utc: chrono::DateTime<chrono::Utc>,
) -> Envelope {
    Envelope {
        schema_version: SCHEMA_VERSION,
        exported_at_utc,
        playlists: playlists.iter().map(playlist_to_dto).collect(),
        selected_playlist_id,
    }
}

fn playlist_to_dto(playlist: &Playlist) -> PlaylistDto {
    let mut videos: Vec<&VideoItem> = playlist.videos.iter().collect();
    videos.sort_by_key(|v| v.position);

    PlaylistDto {
        id: playlist.id,
        name: playlist.name.clone(),
        description: playlist.description.clone(),
        created_at_utc: playlist.created_at,
        updated_at_utc: playlist.updated_at,
        videos: videos.into_iter().map(video_to_dto).collect(),
    }
}

fn video_to_dto(video: &VideoItem) -> VideoDto {
    VideoDto {
        id: video.id,
        you_tube_id: video.youtube_id.clone(),
        title: video.title.clone(),
        thumbnail_url: video.thumbnail_url.clone(),
        duration: video.duration,
        position: video.position,
        added_at_utc: video.added_at,
    }
}

/// Maps a validated envelope into domain entities, renumbering positions to match each
/// playlist's video order (import does not require contiguous positions; the domain
/// model does).
#[must_use]
pub fn envelope_to_playlists(envelope: &Envelope) -> Vec<Playlist> {
    envelope.playlists.iter().map(dto_to_playlist).collect()
}

fn dto_to_playlist(dto: &PlaylistDto) -> Playlist {
    let mut videos: Vec<&VideoDto> = dto.videos.iter().collect();
    videos.sort_by_key(|v| v.position);

    Playlist {
        id: dto.id,
        name: dto.name.clone(),
        description: dto.description.clone(),
        created_at: dto.created_at_utc,
        updated_at: dto.updated_at_utc,
        videos: videos
            .into_iter()
            .enumerate()
            .map(|(index, video)| dto_to_video(video, dto.id, u32::try_from(index).unwrap_or(u32::MAX)))
            .collect(),
    }
}

fn dto_to_video(dto: &VideoDto, playlist_id: Id, position: u32) -> VideoItem {
    VideoItem {
        id: dto.id,
        youtube_id: dto.you_tube_id.clone(),
        title: dto.title.clone(),
        thumbnail_url: dto.thumbnail_url.clone(),
        duration: dto.duration,
        added_at: dto.added_at_utc,
        position,
        playlist_id,
    }
}
