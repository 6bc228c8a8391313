// arcflow-core effects
// Copyright (C) 2021-2026  Daniel Lambert. Licensed under GPL-3.0-or-later, see /COPYING file for details
//! Asynchronous side-effect handlers run by the [`crate::store::Store`] worker after each
//! reduction (§4.6). Effects never mutate state directly; they dispatch follow-up
//! actions.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use shared::Id;

use crate::error::{ErrorContext, ExportError, ImportError, OperationError, ServiceError};
use crate::import_export::{mapper, serializer, validator};
use crate::types::{Action, Playlist, PlayerState, RootState, VideoItem};

/// CRUD operations against the durable playlist catalog (§6). Out of scope: the concrete
/// database/storage is never implemented here, only the boundary the core dispatches
/// effects against.
#[async_trait]
pub trait PlaylistService: Send + Sync {
    /// Returns every playlist.
    async fn get_all(&self) -> Result<Vec<Playlist>, ServiceError>;
    /// Returns a single playlist by id, if it exists.
    async fn get_by_id(&self, id: Id) -> Result<Option<Playlist>, ServiceError>;
    /// Creates a new playlist.
    async fn create(&self, playlist: Playlist) -> Result<Playlist, ServiceError>;
    /// Persists changes to an existing playlist.
    async fn update(&self, playlist: Playlist) -> Result<(), ServiceError>;
    /// Deletes a playlist by id.
    async fn delete(&self, id: Id) -> Result<(), ServiceError>;
    /// Appends a video to a playlist.
    async fn add_video_to_playlist(
        &self,
        playlist_id: Id,
        video: VideoItem,
    ) -> Result<(), ServiceError>;
    /// Removes a video from a playlist.
    async fn remove_video_from_playlist(
        &self,
        playlist_id: Id,
        video_id: Id,
    ) -> Result<(), ServiceError>;
    /// Persists a reordering of a playlist's videos.
    async fn update_video_positions(
        &self,
        playlist_id: Id,
        videos: Vec<VideoItem>,
    ) -> Result<(), ServiceError>;
    /// Replaces the entire catalog (used by import and by general persistence, §4.5).
    async fn replace_all_playlists(&self, playlists: Vec<Playlist>) -> Result<(), ServiceError>;
}

/// The embedded video player (§6). Out of scope: DOM/iframe control; only the call
/// boundary is modeled.
#[async_trait]
pub trait PlayerInterop: Send + Sync {
    /// Loads a video, optionally beginning playback immediately.
    async fn load(&self, video_id: Id, autoplay: bool);
    /// Resumes playback of the loaded video.
    async fn play(&self);
    /// Pauses playback of the loaded video.
    async fn pause(&self);
    /// Tears down the player instance.
    async fn destroy(&self);
}

/// Triggers a browser-side file download (§6).
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Saves `text_content` as a file named `file_name`.
    async fn save(&self, file_name: &str, text_content: &str) -> Result<(), String>;
}

/// Bundles the collaborators an effect handler needs.
pub struct Collaborators {
    /// Playlist persistence collaborator.
    pub playlist_service: Arc<dyn PlaylistService>,
    /// Embedded player collaborator.
    pub player: Arc<dyn PlayerInterop>,
    /// Download collaborator.
    pub downloader: Arc<dyn Downloader>,
}

/// Runs the effect(s), if any, that follow `action` having been reduced into `state`
/// (§4.6). `dispatch` enqueues follow-up actions at the tail of the store's FIFO.
pub async fn run_effects(
    action: &Action,
    state: &RootState,
    dispatch: &UnboundedSender<Action>,
    collaborators: &Collaborators,
) {
    match action {
        Action::Initialize => initialize(dispatch, collaborators).await,
        Action::SelectPlaylist(id) => select_playlist(*id, dispatch, collaborators).await,
        Action::SelectVideo { .. } | Action::NextRequested | Action::PrevRequested => {
            load_current_video(state, collaborators).await;
        }
        Action::SortChanged { .. } => persist_positions(state, dispatch, collaborators).await,
        Action::VideoEnded => {
            send(dispatch, Action::NextRequested);
        }
        Action::CreatePlaylist { name, description } => {
            create_playlist(name.clone(), description.clone(), dispatch, collaborators).await;
        }
        Action::AddVideo { playlist_id, url } => {
            add_video(*playlist_id, url, dispatch, collaborators).await;
        }
        Action::ExportRequested => export(state, dispatch, collaborators).await,
        Action::ImportRequested(text) => import(text, dispatch, collaborators).await,
        Action::ImportApplied { .. } | Action::PersistRequested => {
            persist_catalog(state, dispatch, collaborators).await;
        }
        _ => {}
    }
}

fn send(dispatch: &UnboundedSender<Action>, action: Action) {
    if dispatch.send(action).is_err() {
        warn!("dropping effect dispatch: store is disposed");
    }
}

fn operation_error(err: &ServiceError, operation: &'static str) -> OperationError {
    let category = err.category();
    let message = err.message().to_string();
    OperationError::new(category, message, error_context(operation))
}

/// Builds an [`ErrorContext`] tagged with a fresh correlation id, as every effect must:
/// the reducer is pure and never generates one itself (§4.3).
fn error_context(operation: &'static str) -> ErrorContext {
    ErrorContext {
        correlation_id: Some(Id::new()),
        ..ErrorContext::for_operation(operation)
    }
}

async fn initialize(dispatch: &UnboundedSender<Action>, collaborators: &Collaborators) {
    match collaborators.playlist_service.get_all().await {
        Ok(playlists) => {
            let first_id = playlists.first().map(|p| p.id);
            send(dispatch, Action::PlaylistsLoaded(playlists));
            if let Some(id) = first_id {
                send(dispatch, Action::SelectPlaylist(id));
            }
        }
        Err(err) => send(
            dispatch,
            Action::OperationFailed(operation_error(&err, "initialize")),
        ),
    }
}

async fn select_playlist(id: Id, dispatch: &UnboundedSender<Action>, collaborators: &Collaborators) {
    match collaborators.playlist_service.get_by_id(id).await {
        Ok(Some(playlist)) => {
            let has_videos = !playlist.videos.is_empty();
            send(dispatch, Action::PlaylistLoaded(playlist));
            if has_videos {
                send(
                    dispatch,
                    Action::SelectVideo {
                        index: 0,
                        autoplay: false,
                    },
                );
            }
        }
        Ok(None) => send(
            dispatch,
            Action::OperationFailed(OperationError::new(
                crate::error::ErrorCategory::NotFound,
                "playlist not found",
                error_context("select_playlist"),
            )),
        ),
        Err(err) => send(
            dispatch,
            Action::OperationFailed(operation_error(&err, "select_playlist")),
        ),
    }
}

async fn load_current_video(state: &RootState, collaborators: &Collaborators) {
    if let PlayerState::Loading { video_id, autoplay } = state.player {
        collaborators.player.load(video_id, autoplay).await;
    }
}

async fn persist_positions(
    state: &RootState,
    dispatch: &UnboundedSender<Action>,
    collaborators: &Collaborators,
) {
    let Some(playlist_id) = state.queue.selected_playlist_id else {
        return;
    };
    let result = collaborators
        .playlist_service
        .update_video_positions(playlist_id, state.queue.videos.clone())
        .await;
    if let Err(err) = result {
        send(
            dispatch,
            Action::OperationFailed(operation_error(&err, "sort_changed")),
        );
    }
}

async fn create_playlist(
    name: String,
    description: String,
    dispatch: &UnboundedSender<Action>,
    collaborators: &Collaborators,
) {
    let playlist = Playlist {
        id: Id::new(),
        name,
        description,
        created_at: shared::time_now(),
        updated_at: shared::time_now(),
        videos: Vec::new(),
    };
    match collaborators.playlist_service.create(playlist).await {
        Ok(created) => {
            match collaborators.playlist_service.get_all().await {
                Ok(all) => send(dispatch, Action::PlaylistsLoaded(all)),
                Err(err) => {
                    send(
                        dispatch,
                        Action::OperationFailed(operation_error(&err, "create_playlist")),
                    );
                    return;
                }
            }
            send(dispatch, Action::SelectPlaylist(created.id));
            send(
                dispatch,
                Action::ShowNotification(success_notification("playlist created")),
            );
        }
        Err(err) => send(
            dispatch,
            Action::OperationFailed(operation_error(&err, "create_playlist")),
        ),
    }
}

async fn add_video(
    playlist_id: Id,
    url: &str,
    dispatch: &UnboundedSender<Action>,
    collaborators: &Collaborators,
) {
    let Some(youtube_id) = extract_youtube_id(url) else {
        send(
            dispatch,
            Action::OperationFailed(OperationError::new(
                crate::error::ErrorCategory::Validation,
                "could not extract a YouTube video id from the given URL",
                error_context("add_video"),
            )),
        );
        return;
    };

    let video = VideoItem {
        id: Id::new(),
        youtube_id,
        title: String::new(),
        thumbnail_url: None,
        duration: None,
        added_at: shared::time_now(),
        position: 0,
        playlist_id,
    };

    if let Err(err) = collaborators
        .playlist_service
        .add_video_to_playlist(playlist_id, video)
        .await
    {
        send(
            dispatch,
            Action::OperationFailed(operation_error(&err, "add_video")),
        );
        return;
    }

    match collaborators.playlist_service.get_by_id(playlist_id).await {
        Ok(Some(playlist)) => {
            send(dispatch, Action::PlaylistLoaded(playlist));
            send(
                dispatch,
                Action::ShowNotification(success_notification("video added")),
            );
        }
        Ok(None) => {}
        Err(err) => send(
            dispatch,
            Action::OperationFailed(operation_error(&err, "add_video")),
        ),
    }
}

async fn export(state: &RootState, dispatch: &UnboundedSender<Action>, collaborators: &Collaborators) {
    let crate::types::PlaylistsState::Loaded(playlists) = &state.playlists else {
        send(dispatch, Action::ExportFailed(ExportError::NoPlaylistsLoaded));
        return;
    };

    let now = shared::time_now();
    let envelope = mapper::playlists_to_envelope(playlists, state.queue.selected_playlist_id, now);
    let text = match serializer::serialize(&envelope) {
        Ok(text) => text,
        Err(err) => {
            send(dispatch, Action::ExportFailed(err));
            return;
        }
    };

    send(dispatch, Action::ExportPrepared);

    let file_name = format!("arcflow-export-{}.json", now.format("%Y-%m-%d"));
    match collaborators.downloader.save(&file_name, &text).await {
        Ok(()) => send(dispatch, Action::ExportSucceeded(now)),
        Err(message) => send(dispatch, Action::ExportFailed(ExportError::InteropFailed(message))),
    }
}

/// Runs the §4.5 import pipeline: parse, validate (schema version, fields, id
/// uniqueness), map to the domain, and apply. Dispatches the matching `Import*` action
/// at each stage, or `ImportFailed` at the first failing stage.
async fn import(text: &str, dispatch: &UnboundedSender<Action>, collaborators: &Collaborators) {
    let envelope = match serializer::deserialize(text) {
        Ok(envelope) => envelope,
        Err(err) => {
            send(dispatch, Action::ImportFailed(err));
            return;
        }
    };
    send(dispatch, Action::ImportParsed(envelope.clone()));

    if let Err(err) = validator::validate(&envelope) {
        send(dispatch, Action::ImportFailed(err));
        return;
    }
    send(dispatch, Action::ImportValidated(envelope.clone()));

    let playlists = mapper::envelope_to_playlists(&envelope);
    let playlist_count = playlists.len();
    let video_count = playlists.iter().map(|p| p.videos.len()).sum();
    let selected_playlist_id = envelope.selected_playlist_id;

    if let Err(err) = collaborators
        .playlist_service
        .replace_all_playlists(playlists.clone())
        .await
    {
        send(
            dispatch,
            Action::ImportFailed(ImportError::PersistenceFailed(err.message().to_string())),
        );
        return;
    }

    send(
        dispatch,
        Action::ImportApplied {
            playlists,
            selected_playlist_id,
        },
    );
    send(
        dispatch,
        Action::ImportSucceeded {
            playlist_count,
            video_count,
        },
    );
}

async fn persist_catalog(
    state: &RootState,
    dispatch: &UnboundedSender<Action>,
    collaborators: &Collaborators,
) {
    if !state.persistence.is_dirty {
        debug!("persist effect skipped: catalog is not dirty");
        return;
    }
    let crate::types::PlaylistsState::Loaded(playlists) = &state.playlists else {
        return;
    };
    match collaborators
        .playlist_service
        .replace_all_playlists(playlists.clone())
        .await
    {
        Ok(()) => send(dispatch, Action::PersistSucceeded),
        Err(err) => send(dispatch, Action::PersistFailed(err.message().to_string())),
    }
}

fn success_notification(message: &str) -> crate::types::Notification {
    crate::types::Notification {
        severity: crate::error::Severity::Info,
        message: message.to_string(),
        correlation_id: Id::new(),
        timestamp: shared::time_now(),
        dismissible: true,
    }
}

/// Extracts an 11-character `YouTube` video id from a `watch`, `youtu.be`, or `embed` URL
/// (§6). Anything else yields `None`.
#[must_use]
pub fn extract_youtube_id(url: &str) -> Option<String> {
    fn trailing_id(rest: &str) -> String {
        rest.split(['?', '&']).next().unwrap_or(rest).to_string()
    }

    let candidate = if let Some(query) = url.split("watch?").nth(1) {
        query
            .split('&')
            .find_map(|pair| pair.strip_prefix("v="))
            .map(str::to_string)
    } else if let Some(rest) = url.split("youtu.be/").nth(1) {
        Some(trailing_id(rest))
    } else {
        url.split("embed/").nth(1).map(trailing_id)
    }?;

    let valid = candidate.len() == 11
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid.then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_watch_url() {
        assert_eq!(
            extract_youtube_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn extracts_from_short_url() {
        assert_eq!(
            extract_youtube_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn extracts_from_embed_url() {
        assert_eq!(
            extract_youtube_id("https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn rejects_malformed_ids_and_unrelated_urls() {
        assert_eq!(extract_youtube_id("https://example.com/"), None);
        assert_eq!(
            extract_youtube_id("https://www.youtube.com/watch?v=short"),
            None
        );
    }
}
