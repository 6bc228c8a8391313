// arcflow-core undo policy
// Copyright (C) 2021-2026  Daniel Lambert. Licensed under GPL-3.0-or-later, see /COPYING file for details
//! Total, pure classification of every [`Action`] into exactly one undo-stack treatment
//! (§4.2).

use crate::types::Action;

/// How the reducer should treat `past`/`future` after handling a given action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoClass {
    /// Creates a snapshot before the state change, provided the queue actually changed.
    Undoable,
    /// Resets both stacks to empty.
    Boundary,
    /// Preserves both stacks unchanged; navigation and shuffle/repeat toggles never
    /// enter history.
    PlaybackTransient,
    /// Preserves both stacks but does not add a snapshot.
    Neutral,
}

/// Classifies `action` per the table in §4.2.
#[must_use]
pub fn classify(action: &Action) -> UndoClass {
    match action {
        Action::SelectVideo { .. } | Action::SortChanged { .. } => UndoClass::Undoable,

        Action::PlaylistLoaded(_) | Action::SelectPlaylist(_) | Action::ImportApplied { .. } => {
            UndoClass::Boundary
        }

        Action::NextRequested
        | Action::PrevRequested
        | Action::PlaybackAdvanced(_)
        | Action::PlaybackStopped
        | Action::ShuffleSet { .. }
        | Action::RepeatSet(_) => UndoClass::PlaybackTransient,

        Action::Initialize
        | Action::PlaylistsLoaded(_)
        | Action::PlayerStateChanged { .. }
        | Action::VideoEnded
        | Action::CreatePlaylist { .. }
        | Action::AddVideo { .. }
        | Action::OperationFailed(_)
        | Action::ShowNotification(_)
        | Action::DismissNotification(_)
        | Action::ExportRequested
        | Action::ExportPrepared
        | Action::ExportSucceeded(_)
        | Action::ExportFailed(_)
        | Action::ImportRequested(_)
        | Action::ImportParsed(_)
        | Action::ImportValidated(_)
        | Action::ImportSucceeded { .. }
        | Action::ImportFailed(_)
        | Action::PersistRequested
        | Action::PersistSucceeded
        | Action::PersistFailed(_)
        | Action::UndoRequested
        | Action::RedoRequested => UndoClass::Neutral,
    }
}
