// arcflow-core import validator
// Copyright (C) 2021-2026  Daniel Lambert. Licensed under GPL-3.0-or-later, see /COPYING file for details
//! Envelope validation (§4.5 step 3) and id-uniqueness checking (step 4).

use std::collections::HashSet;

use shared::Id;

use crate::error::ImportError;
use crate::import_export::envelope::Envelope;

/// Rejects `envelope` unless its schema version is supported (§4.5 step 2).
///
/// # Errors
/// Returns [`ImportError::UnsupportedSchema`] if `envelope` was written by a newer schema.
pub fn check_schema_version(envelope: &Envelope) -> Result<(), ImportError> {
    if envelope.schema_version > crate::import_export::envelope::SCHEMA_VERSION {
        return Err(ImportError::UnsupportedSchema(envelope.schema_version));
    }
    Ok(())
}

/// Validates field contents (§4.5 step 3): non-empty names/ids/titles, non-negative
/// positions. Positions are `u32` so non-negativity holds by construction; this checks
/// the remaining textual constraints.
///
/// # Errors
/// Returns [`ImportError::ValidationError`] naming the first empty required field found.
pub fn validate_fields(envelope: &Envelope) -> Result<(), ImportError> {
    for playlist in &envelope.playlists {
        if playlist.name.trim().is_empty() {
            return Err(ImportError::ValidationError(
                "playlists[].name".to_string(),
                "playlist name must not be empty".to_string(),
            ));
        }
        for video in &playlist.videos {
            if video.you_tube_id.trim().is_empty() {
                return Err(ImportError::ValidationError(
                    "playlists[].videos[].youTubeId".to_string(),
                    "youTubeId must not be empty".to_string(),
                ));
            }
            if video.title.trim().is_empty() {
                return Err(ImportError::ValidationError(
                    "playlists[].videos[].title".to_string(),
                    "title must not be empty".to_string(),
                ));
            }
        }
    }
    Ok(())
}

/// Rejects `envelope` if any id (playlist or video) is repeated within it (§4.5 step 4).
/// Import mode is always `ReplaceAll`, so only intra-envelope collisions matter.
///
/// # Errors
/// Returns [`ImportError::IdCollision`] if the same id appears twice.
pub fn check_id_uniqueness(envelope: &Envelope) -> Result<(), ImportError> {
    let mut seen: HashSet<Id> = HashSet::new();
    for playlist in &envelope.playlists {
        if !seen.insert(playlist.id) {
            return Err(ImportError::IdCollision);
        }
        for video in &playlist.videos {
            if !seen.insert(video.id) {
                return Err(ImportError::IdCollision);
            }
        }
    }
    Ok(())
}

/// Runs the full §4.5 validation pipeline (steps 2–4) over a parsed envelope.
///
/// # Errors
/// Returns the first error raised by [`check_schema_version`], [`validate_fields`], or
/// [`check_id_uniqueness`].
pub fn validate(envelope: &Envelope) -> Result<(), ImportError> {
    check_schema_version(envelope)?;
    validate_fields(envelope)?;
    check_id_uniqueness(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import_export::envelope::{PlaylistDto, VideoDto};
    use shared::Id;

    fn base_envelope() -> Envelope {
        Envelope {
            schema_version: 1,
            exported_at_utc: shared::time_now(),
            playlists: Vec::new(),
            selected_playlist_id: None,
        }
    }

    fn video_dto(you_tube_id: &str) -> VideoDto {
        VideoDto {
            id: Id::new(),
            you_tube_id: you_tube_id.to_string(),
            title: "a title".to_string(),
            thumbnail_url: None,
            duration: None,
            position: 0,
            added_at_utc: shared::time_now(),
        }
    }

    #[test]
    fn rejects_unsupported_schema_version() {
        let mut envelope = base_envelope();
        envelope.schema_version = 2;
        assert!(matches!(
            check_schema_version(&envelope),
            Err(ImportError::UnsupportedSchema(2))
        ));
    }

    #[test]
    fn rejects_empty_playlist_name() {
        let mut envelope = base_envelope();
        envelope.playlists.push(PlaylistDto {
            id: Id::new(),
            name: "   ".to_string(),
            description: String::new(),
            created_at_utc: shared::time_now(),
            updated_at_utc: shared::time_now(),
            videos: Vec::new(),
        });
        assert!(matches!(
            validate_fields(&envelope),
            Err(ImportError::ValidationError(_, _))
        ));
    }

    #[test]
    fn rejects_duplicate_video_ids() {
        let mut envelope = base_envelope();
        let shared_video = video_dto("aaaaaaaaaaa");
        envelope.playlists.push(PlaylistDto {
            id: Id::new(),
            name: "one".to_string(),
            description: String::new(),
            created_at_utc: shared::time_now(),
            updated_at_utc: shared::time_now(),
            videos: vec![shared_video.clone()],
        });
        envelope.playlists.push(PlaylistDto {
            id: Id::new(),
            name: "two".to_string(),
            description: String::new(),
            created_at_utc: shared::time_now(),
            updated_at_utc: shared::time_now(),
            videos: vec![shared_video],
        });
        assert!(matches!(
            check_id_uniqueness(&envelope),
            Err(ImportError::IdCollision)
        ));
    }

    #[test]
    fn accepts_a_well_formed_envelope() {
        let mut envelope = base_envelope();
        envelope.playlists.push(PlaylistDto {
            id: Id::new(),
            name: "valid".to_string(),
            description: String::new(),
            created_at_utc: shared::time_now(),
            updated_at_utc: shared::time_now(),
            videos: vec![video_dto("aaaaaaaaaaa")],
        });
        assert!(validate(&envelope).is_ok());
    }
}
