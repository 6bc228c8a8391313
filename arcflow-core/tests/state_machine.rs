// arcflow-core state machine integration tests
// Copyright (C) 2021-2026  Daniel Lambert. Licensed under GPL-3.0-or-later, see /COPYING file for details

// teach me
#![deny(clippy::pedantic)]
// no unsafe
#![forbid(unsafe_code)]
// no unwrap
#![deny(clippy::unwrap_used)]
// yes panic, it's tests!
// docs!
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
//! Exercises the reducer and `Store` end-to-end against the §8 scenarios that need a
//! full action sequence to observe, rather than a single reduction.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use arcflow_core::reduce;
use arcflow_core::types::{Action, NavigationDecision, Playlist, QueueState, RootState, VideoItem};
use arcflow_core::Store;

fn video(youtube_id: &str, position: u32, playlist_id: shared::Id) -> VideoItem {
    VideoItem {
        id: shared::Id::new(),
        youtube_id: youtube_id.to_string(),
        title: youtube_id.to_string(),
        thumbnail_url: None,
        duration: None,
        added_at: shared::time_now(),
        position,
        playlist_id,
    }
}

fn queue_with_videos(videos: Vec<VideoItem>) -> QueueState {
    let mut queue = QueueState::default();
    let current_item_id = videos.first().map(|v| v.id);
    queue.current_index = current_item_id.map(|_| 0);
    queue.current_item_id = current_item_id;
    queue.videos = videos;
    queue
}

/// E3 — shuffle round-trip: two `NextRequested` then two `PrevRequested` revisit,
/// in reverse order, exactly the ids that were visited going forward, landing back on
/// the starting video.
#[test]
fn e3_shuffle_round_trip_returns_to_start() {
    let playlist_id = shared::Id::new();
    let videos = vec![
        video("aaaaaaaaaaa", 0, playlist_id),
        video("bbbbbbbbbbb", 1, playlist_id),
        video("ccccccccccc", 2, playlist_id),
        video("ddddddddddd", 3, playlist_id),
    ];
    let start_id = videos[0].id;

    let mut state = RootState {
        queue: queue_with_videos(videos),
        ..RootState::default()
    };

    state = reduce(
        state,
        Action::ShuffleSet {
            enabled: true,
            seed: Some(42),
        },
    );
    assert!(state.queue.shuffle_enabled);
    assert_eq!(state.queue.shuffle_order.first().copied(), Some(start_id));

    state = reduce(state, Action::NextRequested);
    let first_visited = state.queue.current_item_id.expect("advanced once");
    state = reduce(state, Action::NextRequested);
    let second_visited = state.queue.current_item_id.expect("advanced twice");
    assert_ne!(first_visited, second_visited);

    state = reduce(state, Action::PrevRequested);
    assert_eq!(state.queue.current_item_id, Some(first_visited));
    state = reduce(state, Action::PrevRequested);
    assert_eq!(state.queue.current_item_id, Some(start_id));
}

/// Drives the pure navigation function directly over a shuffled queue of one video with
/// repeat off: there is nowhere left to advance to, so the queue stops rather than
/// looping back on itself.
#[test]
fn shuffle_single_video_next_stops_with_repeat_off() {
    let playlist_id = shared::Id::new();
    let only = video("aaaaaaaaaaa", 0, playlist_id);
    let mut queue = queue_with_videos(vec![only]);
    queue.shuffle_enabled = true;
    queue.shuffle_order = vec![queue.videos[0].id];

    let (decision, _) = arcflow_core::playback::compute_next(&queue);
    assert_eq!(decision, NavigationDecision::Stop);
}

/// E5 variant exercised through the public `Store`: a populated undo stack is cleared
/// once a playlist-boundary action (`SelectPlaylist`) is dispatched.
#[tokio::test]
async fn boundary_action_clears_undo_stack_through_the_store() {
    let playlist_id = shared::Id::new();
    let videos = vec![video("aaaaaaaaaaa", 0, playlist_id), video("bbbbbbbbbbb", 1, playlist_id)];
    let playlist = Playlist {
        id: playlist_id,
        name: "mix".to_string(),
        description: String::new(),
        created_at: shared::time_now(),
        updated_at: shared::time_now(),
        videos: videos.clone(),
    };

    let store = Store::spawn(null_collaborators());
    store.dispatch(Action::PlaylistsLoaded(vec![playlist.clone()]));
    store.dispatch(Action::PlaylistLoaded(playlist));
    store.dispatch(Action::SortChanged {
        old_index: 0,
        new_index: 1,
    });
    tokio::time::sleep(StdDuration::from_millis(20)).await;
    assert!(!store.state().queue.past.is_empty());

    store.dispatch(Action::SelectPlaylist(playlist_id));
    tokio::time::sleep(StdDuration::from_millis(20)).await;

    let state = store.state();
    assert!(state.queue.past.is_empty());
    assert!(state.queue.future.is_empty());
}

/// An import/export round trip through the low-level `import_export` functions directly:
/// exporting the current catalog and re-importing the resulting document reproduces the
/// same videos.
#[test]
fn export_then_import_round_trips_a_catalog() {
    let playlist_id = shared::Id::new();
    let videos = vec![video("aaaaaaaaaaa", 0, playlist_id), video("bbbbbbbbbbb", 1, playlist_id)];
    let playlist = Playlist {
        id: playlist_id,
        name: "mix".to_string(),
        description: String::new(),
        created_at: shared::time_now(),
        updated_at: shared::time_now(),
        videos,
    };

    let envelope = arcflow_core::import_export::mapper::playlists_to_envelope(
        std::slice::from_ref(&playlist),
        Some(playlist_id),
        shared::time_now(),
    );
    let text = arcflow_core::import_export::serializer::serialize(&envelope).expect("serialize");

    let parsed = arcflow_core::import_export::serializer::deserialize(&text).expect("deserialize");
    arcflow_core::import_export::validator::validate(&parsed).expect("validate");
    let restored = arcflow_core::import_export::mapper::envelope_to_playlists(&parsed);

    assert_eq!(restored.len(), 1);
    assert_eq!(restored[0].videos.len(), 2);
    assert_eq!(restored[0].videos[0].youtube_id, "aaaaaaaaaaa");
    assert_eq!(restored[0].videos[1].youtube_id, "bbbbbbbbbbb");
}

/// §4.5's import pipeline driven end-to-end through the public `Store`: dispatching
/// `ImportRequested` with a well-formed envelope runs parse/validate/apply and lands on
/// `ImportSucceeded` with the catalog replaced.
#[tokio::test]
async fn import_requested_through_the_store_applies_the_catalog() {
    let playlist_id = shared::Id::new();
    let videos = vec![video("aaaaaaaaaaa", 0, playlist_id), video("bbbbbbbbbbb", 1, playlist_id)];
    let playlist = Playlist {
        id: playlist_id,
        name: "mix".to_string(),
        description: String::new(),
        created_at: shared::time_now(),
        updated_at: shared::time_now(),
        videos,
    };
    let envelope = arcflow_core::import_export::mapper::playlists_to_envelope(
        std::slice::from_ref(&playlist),
        Some(playlist_id),
        shared::time_now(),
    );
    let text = arcflow_core::import_export::serializer::serialize(&envelope).expect("serialize");

    let store = Store::spawn(null_collaborators());
    store.dispatch(Action::ImportRequested(text));
    tokio::time::sleep(StdDuration::from_millis(20)).await;

    let state = store.state();
    assert!(matches!(
        state.import_export,
        arcflow_core::types::ImportExportState::ImportSucceeded {
            playlist_count: 1,
            video_count: 2,
        }
    ));
    let arcflow_core::types::PlaylistsState::Loaded(loaded) = &state.playlists else {
        unreachable!("expected playlists to be loaded after import");
    };
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].videos[0].youtube_id, "aaaaaaaaaaa");
    // ImportApplied's effect chains into PersistRequested (§4.6); the null collaborator's
    // replace_all_playlists succeeds, so the dirty bit is already cleared again.
    assert!(!state.persistence.is_dirty);
}

/// §4.5 import failure path driven through the `Store`: malformed JSON dispatched as
/// `ImportRequested` lands on `ImportFailed` rather than hanging or silently no-op'ing.
#[tokio::test]
async fn import_requested_with_malformed_text_reports_import_failed() {
    let store = Store::spawn(null_collaborators());
    store.dispatch(Action::ImportRequested("not json".to_string()));
    tokio::time::sleep(StdDuration::from_millis(20)).await;

    let state = store.state();
    assert!(matches!(
        state.import_export,
        arcflow_core::types::ImportExportState::ImportFailed(arcflow_core::error::ImportError::ParseError(_))
    ));
}

/// FIFO ordering (§5): effects dispatched while processing one action are appended to
/// the tail of the queue, so a directly-dispatched action queued before the effect fires
/// is still observed first.
#[tokio::test]
async fn effect_dispatches_are_enqueued_after_pending_actions() {
    let playlist_id = shared::Id::new();
    let videos = vec![video("aaaaaaaaaaa", 0, playlist_id), video("bbbbbbbbbbb", 1, playlist_id)];
    let playlist = Playlist {
        id: playlist_id,
        name: "mix".to_string(),
        description: String::new(),
        created_at: shared::time_now(),
        updated_at: shared::time_now(),
        videos,
    };

    let store = Store::spawn(null_collaborators());
    store.dispatch(Action::PlaylistsLoaded(vec![playlist.clone()]));
    store.dispatch(Action::PlaylistLoaded(playlist));
    // VideoEnded dispatches a follow-up NextRequested effect; RepeatSet is queued
    // directly behind it and must still land.
    store.dispatch(Action::VideoEnded);
    store.dispatch(Action::RepeatSet(arcflow_core::types::RepeatMode::All));
    tokio::time::sleep(StdDuration::from_millis(20)).await;

    let state = store.state();
    assert_eq!(state.queue.repeat_mode, arcflow_core::types::RepeatMode::All);
}

fn null_collaborators() -> arcflow_core::effects::Collaborators {
    use arcflow_core::effects::{Downloader, PlayerInterop, PlaylistService};
    use arcflow_core::error::ServiceError;
    use async_trait::async_trait;
    use shared::Id;

    struct NullPlaylistService;
    #[async_trait]
    impl PlaylistService for NullPlaylistService {
        async fn get_all(&self) -> Result<Vec<Playlist>, ServiceError> {
            Ok(Vec::new())
        }
        async fn get_by_id(&self, _id: Id) -> Result<Option<Playlist>, ServiceError> {
            Ok(None)
        }
        async fn create(&self, playlist: Playlist) -> Result<Playlist, ServiceError> {
            Ok(playlist)
        }
        async fn update(&self, _playlist: Playlist) -> Result<(), ServiceError> {
            Ok(())
        }
        async fn delete(&self, _id: Id) -> Result<(), ServiceError> {
            Ok(())
        }
        async fn add_video_to_playlist(
            &self,
            _playlist_id: Id,
            _video: VideoItem,
        ) -> Result<(), ServiceError> {
            Ok(())
        }
        async fn remove_video_from_playlist(
            &self,
            _playlist_id: Id,
            _video_id: Id,
        ) -> Result<(), ServiceError> {
            Ok(())
        }
        async fn update_video_positions(
            &self,
            _playlist_id: Id,
            _videos: Vec<VideoItem>,
        ) -> Result<(), ServiceError> {
            Ok(())
        }
        async fn replace_all_playlists(&self, _playlists: Vec<Playlist>) -> Result<(), ServiceError> {
            Ok(())
        }
    }

    struct NullPlayer;
    #[async_trait]
    impl PlayerInterop for NullPlayer {
        async fn load(&self, _video_id: Id, _autoplay: bool) {}
        async fn play(&self) {}
        async fn pause(&self) {}
        async fn destroy(&self) {}
    }

    struct NullDownloader;
    #[async_trait]
    impl Downloader for NullDownloader {
        async fn save(&self, _file_name: &str, _text_content: &str) -> Result<(), String> {
            Ok(())
        }
    }

    arcflow_core::effects::Collaborators {
        playlist_service: Arc::new(NullPlaylistService),
        player: Arc::new(NullPlayer),
        downloader: Arc::new(NullDownloader),
    }
}
