// arcflow-core reducer
// Copyright (C) 2021-2026  Daniel Lambert. Licensed under GPL-3.0-or-later, see /COPYING file for details
//! The pure `(RootState, Action) -> RootState` transition function (§4.3). No I/O; no
//! branch is reachable for an action this closed union cannot express.

use std::collections::VecDeque;

use tracing::{debug, trace, warn};

use shared::Id;

use crate::error::OperationError;
use crate::playback;
use crate::snapshot::QueueSnapshot;
use crate::types::{
    Action, ImportExportState, Notification, PlayerState, PlaylistsState, QueueState, RootState,
    UNDO_STACK_CAP,
};
use crate::undo_policy::{classify, UndoClass};

/// Reduces `state` by `action`, producing the next state (§4.3).
#[must_use]
pub fn reduce(state: RootState, action: Action) -> RootState {
    trace!(?action, "reducing action");

    match action {
        Action::UndoRequested => return undo(state),
        Action::RedoRequested => return redo(state),
        _ => {}
    }

    let old_queue = state.queue.clone();
    let pre = QueueSnapshot::capture(&old_queue);
    let class = classify(&action);

    let mut next = apply_action(state, action);

    let queue_changed = old_queue.selected_playlist_id != next.queue.selected_playlist_id
        || old_queue.current_index != next.queue.current_index
        || old_queue.videos != next.queue.videos;

    next.queue = match class {
        UndoClass::Boundary => QueueState {
            past: VecDeque::new(),
            future: VecDeque::new(),
            ..next.queue
        },
        UndoClass::Undoable if queue_changed => {
            let mut past = old_queue.past.clone();
            past.push_back(pre);
            while past.len() > UNDO_STACK_CAP {
                past.pop_front();
            }
            QueueState {
                past,
                future: VecDeque::new(),
                ..next.queue
            }
        }
        UndoClass::PlaybackTransient | UndoClass::Undoable | UndoClass::Neutral => QueueState {
            past: old_queue.past.clone(),
            future: old_queue.future.clone(),
            ..next.queue
        },
    };

    if old_queue.videos != next.queue.videos {
        next.queue = playback::repair_playback_structures(next.queue);
    }

    validate_queue(next)
}

fn undo(state: RootState) -> RootState {
    let mut queue = state.queue;
    let Some(snapshot) = queue.past.pop_back() else {
        return RootState { queue, ..state };
    };
    let current = QueueSnapshot::capture(&queue);
    queue.future.push_back(current);
    while queue.future.len() > UNDO_STACK_CAP {
        queue.future.pop_front();
    }
    queue = snapshot.restore(queue);
    RootState { queue, ..state }
}

fn redo(state: RootState) -> RootState {
    let mut queue = state.queue;
    let Some(snapshot) = queue.future.pop_back() else {
        return RootState { queue, ..state };
    };
    let current = QueueSnapshot::capture(&queue);
    queue.past.push_back(current);
    while queue.past.len() > UNDO_STACK_CAP {
        queue.past.pop_front();
    }
    queue = snapshot.restore(queue);
    RootState { queue, ..state }
}

fn validate_queue(mut state: RootState) -> RootState {
    let queue = &mut state.queue;
    if queue.current_index.is_some_and(|i| i >= queue.videos.len()) {
        queue.current_index = None;
    }
    if let Some(id) = queue.current_item_id {
        if !queue.videos.iter().any(|v| v.id == id) {
            queue.current_item_id = None;
            queue.current_index = None;
        }
    }
    state
}

fn set_cursor(queue: &mut QueueState, video_id: Id) {
    queue.current_index = queue.videos.iter().position(|v| v.id == video_id);
    queue.current_item_id = queue.current_index.map(|_| video_id);
}

fn player_for_stop(queue: &QueueState) -> PlayerState {
    match queue.current_video() {
        Some(video) => PlayerState::Paused { video_id: video.id },
        None => PlayerState::Empty,
    }
}

#[allow(clippy::too_many_lines, clippy::match_same_arms)]
fn apply_action(mut state: RootState, action: Action) -> RootState {
    match action {
        Action::Initialize => {
            state.playlists = PlaylistsState::Loading;
        }

        Action::SelectPlaylist(id) => {
            if state.queue.selected_playlist_id == Some(id) {
                return state;
            }
            state.queue = QueueState {
                selected_playlist_id: Some(id),
                ..QueueState::default()
            };
            state.player = PlayerState::Empty;
        }

        Action::PlaylistsLoaded(list) => {
            state.playlists = if list.is_empty() {
                PlaylistsState::Empty
            } else {
                PlaylistsState::Loaded(list)
            };
        }

        Action::PlaylistLoaded(playlist) => {
            let mut videos = playlist.videos;
            videos.sort_by_key(|v| v.position);
            state.queue = QueueState {
                selected_playlist_id: Some(playlist.id),
                videos,
                ..QueueState::default()
            };
        }

        Action::SelectVideo { index, autoplay } => {
            if index >= state.queue.videos.len() || state.queue.current_index == Some(index) {
                return state;
            }
            if state.queue.shuffle_enabled {
                if let Some(old_current) = state.queue.current_item_id {
                    state.queue.playback_history.push_back(old_current);
                    while state.queue.playback_history.len() > crate::types::PLAYBACK_HISTORY_CAP {
                        state.queue.playback_history.pop_front();
                    }
                }
            }
            let video_id = state.queue.videos[index].id;
            state.queue.current_index = Some(index);
            state.queue.current_item_id = Some(video_id);
            state.player = PlayerState::Loading { video_id, autoplay };
        }

        Action::SortChanged { old_index, new_index } => {
            let len = state.queue.videos.len();
            if old_index >= len || new_index >= len || old_index == new_index {
                return state;
            }
            let current = state.queue.current_index;
            let video = state.queue.videos.remove(old_index);
            state.queue.videos.insert(new_index, video);

            state.queue.current_index = current.map(|c| {
                if c == old_index {
                    new_index
                } else if old_index < c && c <= new_index {
                    c - 1
                } else if new_index <= c && c < old_index {
                    c + 1
                } else {
                    c
                }
            });

            for (index, video) in state.queue.videos.iter_mut().enumerate() {
                video.position = u32::try_from(index).unwrap_or(u32::MAX);
            }
        }

        Action::PlayerStateChanged { yt_code, video_id } => {
            let accepted = matches!(state.player, PlayerState::Loading { .. })
                || state.player.video_id() == Some(video_id);
            if !accepted {
                trace!(yt_code, ?video_id, "ignoring player state event for stale video");
                return state;
            }
            state.player = match yt_code {
                3 => PlayerState::Buffering { video_id },
                1 => PlayerState::Playing { video_id },
                2 | 5 | 0 => PlayerState::Paused { video_id },
                _ => return state,
            };
        }

        Action::VideoEnded => {}

        Action::ShuffleSet { enabled, seed } => {
            if enabled {
                let seed =
                    seed.unwrap_or_else(|| shared::time_now().timestamp_millis().cast_unsigned());
                state.queue.shuffle_order = playback::generate_shuffle_order(
                    &state.queue.videos,
                    state.queue.current_item_id,
                    seed,
                );
                state.queue.shuffle_seed = seed;
                state.queue.playback_history.clear();
                state.queue.shuffle_enabled = true;
            } else {
                state.queue.shuffle_order.clear();
                state.queue.playback_history.clear();
                state.queue.shuffle_enabled = false;
            }
        }

        Action::RepeatSet(mode) => {
            state.queue.repeat_mode = mode;
        }

        Action::NextRequested => {
            let (decision, queue) = playback::compute_next(&state.queue);
            state.queue = queue;
            apply_navigation(&mut state, decision);
        }

        Action::PrevRequested => {
            let (decision, queue) = playback::compute_prev(&state.queue);
            state.queue = queue;
            apply_navigation(&mut state, decision);
        }

        Action::PlaybackAdvanced(video_id) => {
            set_cursor(&mut state.queue, video_id);
        }

        Action::PlaybackStopped => {
            state.player = player_for_stop(&state.queue);
        }

        Action::CreatePlaylist { .. } | Action::AddVideo { .. } => {
            debug!("reducer pass-through; handled entirely by effect");
        }

        Action::OperationFailed(err) => {
            state.notifications.push(notification_from_error(&err));
        }

        Action::ShowNotification(notification) => {
            state.notifications.push(notification);
        }

        Action::DismissNotification(id) => {
            state.notifications.retain(|n| n.correlation_id != id);
        }

        Action::ExportRequested => {
            state.import_export = ImportExportState::ExportInProgress;
        }

        Action::ExportPrepared => {}

        Action::ExportSucceeded(at) => {
            state.import_export = ImportExportState::ExportSucceeded(at);
        }

        Action::ExportFailed(err) => {
            state.import_export = ImportExportState::ExportFailed(err);
        }

        Action::ImportRequested(_) => {
            state.import_export = ImportExportState::ImportParsing;
        }

        Action::ImportParsed(envelope) => {
            state.import_export = ImportExportState::ImportParsed(envelope);
        }

        Action::ImportValidated(envelope) => {
            state.import_export = ImportExportState::ImportValidated(envelope);
        }

        Action::ImportApplied {
            playlists,
            selected_playlist_id,
        } => {
            state.playlists = if playlists.is_empty() {
                PlaylistsState::Empty
            } else {
                PlaylistsState::Loaded(playlists)
            };
            state.queue = QueueState {
                selected_playlist_id,
                ..QueueState::default()
            };
            state.player = PlayerState::Empty;
            state.persistence.is_dirty = true;
            state.import_export = ImportExportState::ImportApplied;
        }

        Action::ImportSucceeded {
            playlist_count,
            video_count,
        } => {
            state.import_export = ImportExportState::ImportSucceeded {
                playlist_count,
                video_count,
            };
        }

        Action::ImportFailed(err) => {
            state.import_export = ImportExportState::ImportFailed(err);
        }

        Action::PersistRequested => {}

        Action::PersistSucceeded => {
            state.persistence.is_dirty = false;
            state.persistence.last_persist_attempt_utc = Some(shared::time_now());
            state.persistence.last_persist_error = None;
        }

        Action::PersistFailed(message) => {
            state.persistence.last_persist_attempt_utc = Some(shared::time_now());
            state.persistence.last_persist_error = Some(message);
        }

        Action::UndoRequested | Action::RedoRequested => {
            warn!("undo/redo must be handled before apply_action");
        }
    }

    state
}

fn apply_navigation(state: &mut RootState, decision: crate::types::NavigationDecision) {
    use crate::types::NavigationDecision;
    match decision {
        NavigationDecision::AdvanceTo(video_id) => {
            set_cursor(&mut state.queue, video_id);
            state.player = PlayerState::Loading {
                video_id,
                autoplay: true,
            };
        }
        NavigationDecision::Stop => {
            state.player = player_for_stop(&state.queue);
        }
        NavigationDecision::NoOp => {}
    }
}

fn notification_from_error(err: &OperationError) -> Notification {
    Notification {
        severity: err.category.severity(),
        message: err.message.clone(),
        correlation_id: err
            .context
            .correlation_id
            .expect("effects always set a correlation id when raising an OperationError"),
        timestamp: shared::time_now(),
        dismissible: true,
    }
}
