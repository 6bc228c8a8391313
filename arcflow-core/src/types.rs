// arcflow-core data model
// Copyright (C) 2021-2026  Daniel Lambert. Licensed under GPL-3.0-or-later, see /COPYING file for details
//! Discriminated unions for state slices, actions, decisions, and notifications (§3).

use std::collections::VecDeque;
use std::time::Duration;

use shared::{Id, Time};

use crate::error::{ExportError, ImportError, OperationError};
use crate::import_export::Envelope;

/// Identity of a [`Playlist`].
pub type PlaylistId = Id;
/// Identity of a [`VideoItem`].
pub type VideoId = Id;
/// Identity of a [`Notification`], used to correlate dismissal and error reporting.
pub type CorrelationId = Id;

/// Maximum number of identities retained in [`QueueState::playback_history`] (§3).
pub const PLAYBACK_HISTORY_CAP: usize = 100;
/// Maximum number of entries retained in [`QueueState::past`] / [`QueueState::future`] (§3).
pub const UNDO_STACK_CAP: usize = 30;

/// A single video within a [`Playlist`].
#[derive(Debug, Clone, PartialEq)]
pub struct VideoItem {
    /// Stable identity, survives reordering.
    pub id: VideoId,
    /// The upstream `YouTube` video id (11 characters, see §6).
    pub youtube_id: String,
    /// Display title.
    pub title: String,
    /// Thumbnail URL, if known.
    pub thumbnail_url: Option<String>,
    /// Video duration, if known.
    pub duration: Option<Duration>,
    /// When the video was added to its playlist.
    pub added_at: Time,
    /// Contiguous 0-based position within the owning playlist.
    pub position: u32,
    /// The playlist this video belongs to (a lookup value, not an ownership edge — §9).
    pub playlist_id: PlaylistId,
}

/// A named, ordered collection of [`VideoItem`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    /// Stable identity.
    pub id: PlaylistId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: Time,
    /// Last-modified timestamp.
    pub updated_at: Time,
    /// Videos owned by this playlist, ordered by [`VideoItem::position`].
    pub videos: Vec<VideoItem>,
}

/// Lifecycle of the playlist catalog.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlaylistsState {
    /// Initial state, before the playlist service has responded.
    #[default]
    Loading,
    /// The service responded with at least one playlist.
    Loaded(Vec<Playlist>),
    /// The service responded with zero playlists.
    Empty,
    /// The service failed to respond.
    Error(String),
}

/// Strategy for repeating playback at the end of the queue (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Stop at the end of the queue.
    #[default]
    Off,
    /// Wrap back to the first item.
    All,
    /// Repeat the current item indefinitely.
    One,
}

/// The video queue and playback cursor (§3).
///
/// # Invariants
/// - if `current_index` is set, it is a valid index into `videos`
/// - if `current_item_id` is set, the identity exists in `videos`
/// - `current_index` and `current_item_id`, when both set, denote the same video
/// - every id in `shuffle_order` and `playback_history` exists in `videos`
/// - if `shuffle_enabled`, `shuffle_order` is a permutation of `videos`' identities
#[derive(Debug, Clone, PartialEq)]
pub struct QueueState {
    /// The playlist this queue was populated from.
    pub selected_playlist_id: Option<PlaylistId>,
    /// The videos in the queue, ordered by [`VideoItem::position`].
    pub videos: Vec<VideoItem>,
    /// Ordinal of the current video within `videos`.
    pub current_index: Option<usize>,
    /// Identity of the current video; survives reorderings.
    pub current_item_id: Option<VideoId>,
    /// Repeat strategy applied at the end of traversal.
    pub repeat_mode: RepeatMode,
    /// Whether shuffled traversal order is in effect.
    pub shuffle_enabled: bool,
    /// Traversal order while shuffle is active; a permutation of `videos`' identities.
    pub shuffle_order: Vec<VideoId>,
    /// Seed for the deterministic shuffle permutation.
    pub shuffle_seed: u64,
    /// Identities visited, most-recent last; capped at [`PLAYBACK_HISTORY_CAP`].
    pub playback_history: VecDeque<VideoId>,
    /// Undo stack of prior queue snapshots; capped at [`UNDO_STACK_CAP`].
    pub past: VecDeque<crate::snapshot::QueueSnapshot>,
    /// Redo stack of superseded queue snapshots; capped at [`UNDO_STACK_CAP`].
    pub future: VecDeque<crate::snapshot::QueueSnapshot>,
}

impl Default for QueueState {
    fn default() -> Self {
        Self {
            selected_playlist_id: None,
            videos: Vec::new(),
            current_index: None,
            current_item_id: None,
            repeat_mode: RepeatMode::Off,
            shuffle_enabled: false,
            shuffle_order: Vec::new(),
            shuffle_seed: 0,
            playback_history: VecDeque::new(),
            past: VecDeque::new(),
            future: VecDeque::new(),
        }
    }
}

impl QueueState {
    /// The currently focused video, if any.
    #[must_use]
    pub fn current_video(&self) -> Option<&VideoItem> {
        self.current_index.and_then(|i| self.videos.get(i))
    }
}

/// Lifecycle of the embedded video player (§3).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlayerState {
    /// No video loaded.
    #[default]
    Empty,
    /// A video was requested to load.
    Loading {
        /// The video being loaded.
        video_id: VideoId,
        /// Whether to begin playback immediately once loaded.
        autoplay: bool,
    },
    /// The player is buffering a loaded video.
    Buffering {
        /// The buffering video.
        video_id: VideoId,
    },
    /// The player is actively playing a video.
    Playing {
        /// The playing video.
        video_id: VideoId,
    },
    /// The player is paused on a video.
    Paused {
        /// The paused video.
        video_id: VideoId,
    },
    /// The player reported an error.
    Error(String),
}

impl PlayerState {
    /// The video id this state concerns, if any.
    #[must_use]
    pub fn video_id(&self) -> Option<VideoId> {
        match self {
            Self::Loading { video_id, .. }
            | Self::Buffering { video_id }
            | Self::Playing { video_id }
            | Self::Paused { video_id } => Some(*video_id),
            Self::Empty | Self::Error(_) => None,
        }
    }
}

/// Lifecycle of an import or export operation (§3, §4.5).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ImportExportState {
    /// No import/export in progress.
    #[default]
    Idle,
    /// An export is being prepared.
    ExportInProgress,
    /// The export completed and was handed to the download collaborator.
    ExportSucceeded(Time),
    /// The export failed.
    ExportFailed(ExportError),
    /// Import text is being parsed.
    ImportParsing,
    /// The import text was parsed into an envelope.
    ImportParsed(Envelope),
    /// The parsed envelope passed validation.
    ImportValidated(Envelope),
    /// The validated envelope was applied to the catalog.
    ImportApplied,
    /// The import completed successfully.
    ImportSucceeded {
        /// Number of playlists imported.
        playlist_count: usize,
        /// Number of videos imported.
        video_count: usize,
    },
    /// The import failed.
    ImportFailed(ImportError),
}

impl PartialEq for ExportError {
    fn eq(&self, other: &Self) -> bool {
        format!("{self}") == format!("{other}")
    }
}
impl PartialEq for ImportError {
    fn eq(&self, other: &Self) -> bool {
        format!("{self}") == format!("{other}")
    }
}

/// Persistence lifecycle bit tracking whether in-memory state has been written back (§3).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersistenceState {
    /// Whether the in-memory catalog differs from durable storage.
    pub is_dirty: bool,
    /// When persistence was last attempted.
    pub last_persist_attempt_utc: Option<Time>,
    /// Error from the most recent failed persist attempt.
    pub last_persist_error: Option<String>,
}

/// Severity of a [`Notification`], driving its presentation.
pub use crate::error::Severity as NotificationSeverity;

/// A user-facing notification (§3, §7).
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Presentation severity.
    pub severity: NotificationSeverity,
    /// Human-readable message.
    pub message: String,
    /// Correlates this notification to the error/action that raised it.
    pub correlation_id: CorrelationId,
    /// When the notification was raised.
    pub timestamp: Time,
    /// Whether the user can dismiss this notification.
    pub dismissible: bool,
}

/// The complete, immutable application state (§3).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RootState {
    /// Catalog of playlists.
    pub playlists: PlaylistsState,
    /// The active queue and playback cursor.
    pub queue: QueueState,
    /// The embedded player's lifecycle.
    pub player: PlayerState,
    /// Import/export lifecycle.
    pub import_export: ImportExportState,
    /// Persistence dirty-bit and last-attempt bookkeeping.
    pub persistence: PersistenceState,
    /// Ordered, user-facing notifications.
    pub notifications: Vec<Notification>,
}

/// Outcome of a [`crate::playback`] navigation query (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// No traversal is possible (empty queue, or sequential end with `RepeatMode::Off`).
    Stop,
    /// The cursor did not move (e.g. `PrevRequested` at the first item).
    NoOp,
    /// Advance the cursor to the given video identity.
    AdvanceTo(VideoId),
}

/// An immutable value describing an intent to change state, or the result of an
/// asynchronous operation (§4.3). A closed union: the reducer never fails on a
/// well-formed action because every variant here has a handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Begin loading the playlist catalog.
    Initialize,
    /// Select a playlist to populate the queue from.
    SelectPlaylist(PlaylistId),
    /// The playlist service responded with the full catalog.
    PlaylistsLoaded(Vec<Playlist>),
    /// A single playlist (with its videos) was loaded into the queue.
    PlaylistLoaded(Playlist),
    /// Focus a specific video in the queue.
    SelectVideo {
        /// Ordinal within `QueueState::videos`.
        index: usize,
        /// Whether to begin playback immediately.
        autoplay: bool,
    },
    /// Move a video from one position to another.
    SortChanged {
        /// Source ordinal.
        old_index: usize,
        /// Destination ordinal.
        new_index: usize,
    },
    /// The embedded player reported a raw `YouTube` `IFrame` state code.
    PlayerStateChanged {
        /// Raw `YouTube` player state code.
        yt_code: i32,
        /// Video the event concerns.
        video_id: VideoId,
    },
    /// The embedded player reported that playback reached the end of a video.
    VideoEnded,
    /// Enable or disable shuffled traversal.
    ShuffleSet {
        /// Whether shuffle should be enabled.
        enabled: bool,
        /// Explicit seed; when absent and enabling, a seed is derived from the current time.
        seed: Option<u64>,
    },
    /// Set the repeat strategy.
    RepeatSet(RepeatMode),
    /// Request advancing to the next video.
    NextRequested,
    /// Request returning to the previous video.
    PrevRequested,
    /// The cursor advanced to a video outside the `NextRequested`/`PrevRequested` path
    /// (e.g. external playback sync).
    PlaybackAdvanced(VideoId),
    /// Playback stopped without a following video to advance to.
    PlaybackStopped,
    /// Request a new playlist be created.
    CreatePlaylist {
        /// Display name.
        name: String,
        /// Free-form description.
        description: String,
    },
    /// Request a video (given a raw URL) be added to a playlist.
    AddVideo {
        /// Target playlist.
        playlist_id: PlaylistId,
        /// Raw URL to extract a `YouTube` video id from (§6).
        url: String,
    },
    /// An effect failed.
    OperationFailed(OperationError),
    /// Append a notification directly (not derived from an [`OperationError`]).
    ShowNotification(Notification),
    /// Remove a notification by its correlation id.
    DismissNotification(CorrelationId),
    /// Begin the export pipeline.
    ExportRequested,
    /// The envelope was built and serialized; handing off to the download collaborator.
    ExportPrepared,
    /// The export completed.
    ExportSucceeded(Time),
    /// The export failed.
    ExportFailed(ExportError),
    /// Begin the import pipeline with raw JSON text.
    ImportRequested(String),
    /// The import text was parsed into an envelope.
    ImportParsed(Envelope),
    /// The parsed envelope passed validation.
    ImportValidated(Envelope),
    /// Replace the catalog and queue with an imported one (the single state-replacing action).
    ImportApplied {
        /// The imported playlists.
        playlists: Vec<Playlist>,
        /// Playlist to select after import, if any.
        selected_playlist_id: Option<PlaylistId>,
    },
    /// The import completed successfully.
    ImportSucceeded {
        /// Number of playlists imported.
        playlist_count: usize,
        /// Number of videos imported.
        video_count: usize,
    },
    /// The import failed.
    ImportFailed(ImportError),
    /// Request the in-memory catalog be written to durable storage.
    PersistRequested,
    /// Persistence succeeded.
    PersistSucceeded,
    /// Persistence failed.
    PersistFailed(String),
    /// Undo the most recent undoable action.
    UndoRequested,
    /// Redo the most recently undone action.
    RedoRequested,
}
